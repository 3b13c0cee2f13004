//! SQLite-backed vector store
//!
//! Collections live in one database file. Embeddings are stored as
//! little-endian f32 blobs; cosine distance is computed in Rust at query
//! time with a full scan of the collection. Fine for corpus-scale data,
//! no ANN index.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{params, Connection};

use crate::error::{Error, Result};

use super::{Collection, QueryMatch, VectorStore};

/// Vector store persisting collections in a single SQLite database.
pub struct SqliteVectorStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteVectorStore {
    /// Create or open the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| Error::VectorDb(format!("failed to open database: {}", e)))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Create an in-memory store (tests and throwaway runs).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::VectorDb(format!("failed to open in-memory database: {}", e)))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        "#,
        )
        .map_err(|e| Error::VectorDb(format!("failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                metric TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chunks (
                collection TEXT NOT NULL,
                chunk_id TEXT NOT NULL,
                document TEXT NOT NULL,
                source TEXT NOT NULL,
                embedding BLOB NOT NULL,
                PRIMARY KEY (collection, chunk_id)
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_collection ON chunks(collection);
        "#,
        )
        .map_err(|e| Error::VectorDb(format!("failed to run migrations: {}", e)))?;

        Ok(())
    }
}

impl VectorStore for SqliteVectorStore {
    fn get_or_create(&self, name: &str) -> Result<Box<dyn Collection>> {
        {
            let conn = self.conn.lock();
            conn.execute(
                "INSERT OR IGNORE INTO collections (name, metric) VALUES (?1, 'cosine')",
                params![name],
            )?;
        }
        Ok(Box::new(SqliteCollection {
            conn: Arc::clone(&self.conn),
            name: name.to_string(),
        }))
    }

    fn delete(&self, name: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM chunks WHERE collection = ?1", params![name])?;
        conn.execute("DELETE FROM collections WHERE name = ?1", params![name])?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT name FROM collections ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

/// Handle to one named collection.
struct SqliteCollection {
    conn: Arc<Mutex<Connection>>,
    name: String,
}

impl Collection for SqliteCollection {
    fn add(
        &self,
        ids: &[String],
        documents: &[String],
        sources: &[String],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        if ids.len() != documents.len()
            || ids.len() != sources.len()
            || ids.len() != embeddings.len()
        {
            return Err(Error::VectorDb(format!(
                "mismatched add lengths: {} ids, {} documents, {} sources, {} embeddings",
                ids.len(),
                documents.len(),
                sources.len(),
                embeddings.len()
            )));
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO chunks (collection, chunk_id, document, source, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for i in 0..ids.len() {
                stmt.execute(params![
                    self.name,
                    ids[i],
                    documents[i],
                    sources[i],
                    encode_embedding(&embeddings[i]),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT document, source, embedding FROM chunks WHERE collection = ?1",
        )?;
        let rows = stmt.query_map(params![self.name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Vec<u8>>(2)?,
            ))
        })?;

        let mut matches = Vec::new();
        for row in rows {
            let (document, source, blob) = row?;
            let candidate = decode_embedding(&blob);
            let distance = cosine_distance(embedding, &candidate);
            matches.push(QueryMatch {
                document,
                source: Some(source),
                distance,
            });
        }

        // Unknown distances sort last
        matches.sort_by(|a, b| {
            a.distance
                .unwrap_or(f32::MAX)
                .total_cmp(&b.distance.unwrap_or(f32::MAX))
        });
        matches.truncate(top_k);
        Ok(matches)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![self.name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

fn decode_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect()
}

/// Cosine distance (1 - cosine similarity) over f64 accumulators.
fn cosine_distance(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let x = f64::from(x);
        let y = f64::from(y);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    Some((1.0 - similarity) as f32)
}
