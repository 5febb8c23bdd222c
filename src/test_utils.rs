/// # Test Utilities Module
///
/// Fixtures for unit tests: connected facades over private in-memory
/// SQLite databases, so tests never share state.

use crate::core::{Database, Result};

/// A connected facade with an isolated database
pub struct FacadeFixture {
    pub db: Database,
}

impl FacadeFixture {
    /// Create a connected facade over an empty in-memory database
    pub fn new() -> Result<Self> {
        let db = Database::sqlite();
        db.connect("", "", "", ":memory:")?;
        Ok(FacadeFixture { db })
    }

    /// Create a fixture with an `items` table holding three rows
    /// (`nut`, `washer`, `screw`, ids 1 to 3)
    pub fn with_items() -> Result<Self> {
        let fixture = Self::new()?;
        fixture.db.query(
            "CREATE TABLE items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                qty INTEGER
            )",
            &[],
        )?;
        for (name, qty) in [("nut", 10), ("washer", 25), ("screw", 7)] {
            fixture
                .db
                .query("INSERT INTO items (name, qty) VALUES (?, ?)", &[name.into(), qty.into()])?;
        }
        Ok(fixture)
    }
}
