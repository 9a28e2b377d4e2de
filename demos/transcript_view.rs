//! Minimal example: phivault at the edges of a notes service.
//!
//! Demonstrates column encryption with legacy-row tolerance and an audited
//! redacted view, with the audit trail persisted to a file.
//! Run with: `cargo run --example transcript_view`

use phivault::audit::FileAuditSink;
use phivault::{generate_key, PatientIdentity, PhiVault, RedactionOptions, VaultConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // 1. Start-up: in production ENCRYPTION_KEY comes from the environment.
    let key = generate_key()?;
    let config = VaultConfig::from_lookup(|name| (name == "ENCRYPTION_KEY").then(|| key.clone()))?;
    let mut vault = PhiVault::from_config(config)?;

    let audit_path = std::env::temp_dir().join("phivault_audit.jsonl");
    vault.add_audit_sink(Box::new(FileAuditSink::new(&audit_path)?));

    // 2. Write path: the ORM stores the envelope, not the text.
    let transcript = "Jane Doe says the new dose helps. Call back at 555-123-4567.";
    let stored = vault.column().to_db(Some(transcript))?;
    println!("stored column value: {}", stored.as_deref().unwrap_or_default());

    // 3. Read path, including a row written before encryption was enabled.
    let loaded = vault.column().from_db(stored.as_deref());
    let legacy = vault.column().from_db(Some("Legacy: plain: row"));
    println!("legacy row reads as: {}", legacy.unwrap_or_default());

    // 4. Redacted view for a reviewer.
    let patient = PatientIdentity::new("Jane", "Doe");
    let view = vault.view_redacted(
        phivault::ViewRequest::transcript(loaded.as_deref().unwrap_or_default())
            .resource_id("transcript-1")
            .patient_id("patient-1")
            .patient(&patient)
            .options(RedactionOptions::default()),
    )?;
    println!(
        "redacted ({} items, {} -> {} chars): {}",
        view.redacted_items_count, view.original_length, view.redacted_length, view.redacted_text
    );

    println!("Audit log: {} record(s)", vault.audit_log().len());
    println!("Full audit also written to: {}", audit_path.display());

    Ok(())
}
