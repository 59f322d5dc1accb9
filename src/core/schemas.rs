//! Centralized database schema definitions for the soul store.
//!
//! Every entity lives as a JSON document in one `records` table, keyed by
//! `<type>:<id>`. Key ranges per type are `[<type>:, <type>;)` because `;`
//! sorts immediately after `:`.
//!
//! The two secondary indexes are partial expression indexes over the JSON
//! payload. They only cover rows whose payload is valid JSON, so a corrupt
//! record can be stored without breaking the index and is never returned by
//! an indexed lookup.

pub const SOUL_DB_SCHEMA_RECORDS: &str = "
    CREATE TABLE IF NOT EXISTS records (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
";

pub const SOUL_DB_INDEX_ARTIFACTS_BY_SOURCE: &str = "
    CREATE INDEX IF NOT EXISTS artifacts_by_source
        ON records(json_extract(value, '$.source'), key)
        WHERE key >= 'artifact:' AND key < 'artifact;' AND json_valid(value)
";

pub const SOUL_DB_INDEX_PRINCIPLES_BY_STATUS: &str = "
    CREATE INDEX IF NOT EXISTS principles_by_status
        ON records(json_extract(value, '$.status'), key)
        WHERE key >= 'principle:' AND key < 'principle;' AND json_valid(value)
";

pub const SOUL_DB_INDEXES: &[(&str, &str)] = &[
    ("artifacts_by_source", SOUL_DB_INDEX_ARTIFACTS_BY_SOURCE),
    ("principles_by_status", SOUL_DB_INDEX_PRINCIPLES_BY_STATUS),
];

pub const UPSERT_RECORD: &str = "
    INSERT INTO records(key, value) VALUES(?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value
";

pub const INSERT_RECORD: &str = "INSERT INTO records(key, value) VALUES(?1, ?2)";

pub const SELECT_RECORD: &str = "SELECT value FROM records WHERE key = ?1";

pub const RECORD_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM records WHERE key = ?1)";

pub const SCAN_RANGE: &str =
    "SELECT key, value FROM records WHERE key >= ?1 AND key < ?2 ORDER BY key";

pub const COUNT_RANGE: &str = "SELECT COUNT(*) FROM records WHERE key >= ?1 AND key < ?2";

// Indexed scans repeat the partial index predicate verbatim so the planner can use it.

pub const SCAN_ARTIFACTS_BY_SOURCE: &str = "
    SELECT key, value FROM records
    WHERE key >= 'artifact:' AND key < 'artifact;' AND json_valid(value)
      AND json_extract(value, '$.source') = ?1
    ORDER BY key
";

pub const SCAN_ARTIFACTS_UNKNOWN_SOURCE: &str = "
    SELECT key, value FROM records
    WHERE key >= 'artifact:' AND key < 'artifact;' AND json_valid(value)
      AND (json_extract(value, '$.source') IS NULL
           OR json_extract(value, '$.source') NOT IN ('heart', 'brain', 'shadow', 'inbox'))
    ORDER BY key
";

pub const SCAN_PRINCIPLES_BY_STATUS: &str = "
    SELECT key, value FROM records
    WHERE key >= 'principle:' AND key < 'principle;' AND json_valid(value)
      AND json_extract(value, '$.status') = ?1
    ORDER BY key
";

pub const SCAN_PRINCIPLES_UNKNOWN_STATUS: &str = "
    SELECT key, value FROM records
    WHERE key >= 'principle:' AND key < 'principle;' AND json_valid(value)
      AND (json_extract(value, '$.status') IS NULL
           OR json_extract(value, '$.status') NOT IN ('candidate', 'confirmed', 'ungrounded'))
    ORDER BY key
";

pub const MAX_GOVERNOR_VERSION: &str = "
    SELECT COALESCE(MAX(CAST(json_extract(value, '$.version') AS INTEGER)), 0) FROM records
    WHERE key >= 'governor:' AND key < 'governor;' AND json_valid(value)
";
