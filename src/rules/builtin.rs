//! Built-in heuristic tables. Used whenever the config does not replace them.

/// Filename substrings commonly seen on repackaged or malicious APKs.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "hack",
    "crack",
    "mod",
    "premium",
    "free",
    "cheat",
    "virus",
    "trojan",
    "malware",
    "spyware",
    "keylogger",
    "bot",
    "exploit",
    "root",
    "jailbreak",
    "adware",
    "ransomware",
];

/// Permission substrings treated as dangerous (personal data, sensors, messaging).
pub const DANGEROUS_PERMISSIONS: &[&str] = &[
    "READ_SMS",
    "SEND_SMS",
    "RECEIVE_SMS",
    "READ_CONTACTS",
    "WRITE_CONTACTS",
    "ACCESS_FINE_LOCATION",
    "ACCESS_COARSE_LOCATION",
    "RECORD_AUDIO",
    "CAMERA",
    "READ_CALL_LOG",
    "WRITE_CALL_LOG",
];

pub fn suspicious_keywords() -> Vec<String> {
    SUSPICIOUS_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

pub fn dangerous_permissions() -> Vec<String> {
    DANGEROUS_PERMISSIONS.iter().map(|s| s.to_string()).collect()
}
