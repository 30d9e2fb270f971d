use uuid::Uuid;

/// Generates a fresh record identifier.
///
/// Identifiers are random (v4) UUIDs in hyphenated form. They are never
/// derived from record content, so two identical records still get
/// distinct identifiers.
pub fn generate_fid() -> String {
    Uuid::new_v4().to_string()
}
