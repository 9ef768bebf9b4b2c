use super::*;

fn creds() -> AdminCredentials {
    AdminCredentials::new("admin", "correct horse")
}

#[test]
fn accepts_exact_match() {
    assert!(creds().check_credentials("admin", "correct horse", true));
}

#[test]
fn rejects_when_no_header_was_presented() {
    assert!(!creds().check_credentials("admin", "correct horse", false));
    assert!(!creds().check_credentials("", "", false));
}

#[test]
fn rejects_one_character_difference_in_either_field() {
    assert!(!creds().check_credentials("admim", "correct horse", true));
    assert!(!creds().check_credentials("admin", "correct hors3", true));
    assert!(!creds().check_credentials("Admin", "correct horse", true));
}

#[test]
fn rejects_prefix_and_length_mismatch() {
    assert!(!creds().check_credentials("adm", "correct horse", true));
    assert!(!creds().check_credentials("admin", "correct", true));
    assert!(!creds().check_credentials("admin", "correct horse!", true));
    assert!(!creds().check_credentials("admin ", "correct horse", true));
    assert!(!creds().check_credentials("", "", true));
}

#[test]
fn rejects_swapped_fields() {
    assert!(!creds().check_credentials("correct horse", "admin", true));
}
