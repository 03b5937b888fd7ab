use super::*;
use crate::config::GENERATION_API_KEY_ENV;
use serial_test::serial;

#[test]
#[serial]
fn unconfigured_client_refuses_to_generate() {
    // SAFETY: serialized test, no concurrent env access
    unsafe {
        std::env::remove_var(GENERATION_API_KEY_ENV);
    }

    let client = GenerationClient::new(&GenerationConfig::default());

    assert!(!client.is_configured());
    assert!(client.generate("What are the hostel fees?").is_err());
}

#[test]
#[serial]
fn credential_presence_configures_the_client() {
    // SAFETY: serialized test, no concurrent env access
    unsafe {
        std::env::set_var(GENERATION_API_KEY_ENV, "hf_test_token");
    }

    let client = GenerationClient::new(&GenerationConfig::default());
    assert!(client.is_configured());

    // SAFETY: serialized test, no concurrent env access
    unsafe {
        std::env::remove_var(GENERATION_API_KEY_ENV);
    }
}

#[test]
fn answer_marker_is_stripped() {
    assert_eq!(
        clean_generated_text("ANSWER: The fee is 4 lakhs."),
        "The fee is 4 lakhs."
    );
    assert_eq!(
        clean_generated_text("answer:  Hostels include Wi-Fi."),
        "Hostels include Wi-Fi."
    );
    assert_eq!(
        clean_generated_text("  Plain output.  "),
        "Plain output."
    );
    assert_eq!(clean_generated_text("ANSWER:"), "");
}
