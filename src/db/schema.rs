//! SQL DDL for initializing the identity record storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - the five extracted fields; `date_of_birth` is ISO-8601 text or NULL
/// - no uniqueness on `document_number`: repeated uploads produce repeated rows
/// - one lookup index per data column
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS identity_documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_number TEXT NOT NULL DEFAULT '',
    full_name TEXT NOT NULL DEFAULT '',
    date_of_birth TEXT NULL, -- YYYY-MM-DD
    gender TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_identity_documents_document_number ON identity_documents(document_number);
CREATE INDEX IF NOT EXISTS idx_identity_documents_full_name ON identity_documents(full_name);
CREATE INDEX IF NOT EXISTS idx_identity_documents_date_of_birth ON identity_documents(date_of_birth);
CREATE INDEX IF NOT EXISTS idx_identity_documents_gender ON identity_documents(gender);
CREATE INDEX IF NOT EXISTS idx_identity_documents_address ON identity_documents(address);
"#;
