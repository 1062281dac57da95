// touchline-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::types::{TimeUnit, Value};
use duckdb::{Config, Connection, OptionalExt, params, params_from_iter};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

// Imports Hexagonaux
use crate::domain::dataset::{Cell, ColumnKind, Dataset};
use crate::domain::mapping::{PlayerRecord, TeamNameSource};
use crate::error::TouchlineError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::lookup::LookupStore;
use crate::ports::warehouse::{ColumnSchema, Warehouse};

const LOOKUP_DDL: &str = "
CREATE SCHEMA IF NOT EXISTS lookup;
CREATE TABLE IF NOT EXISTS lookup.teams (
    team_id BIGINT PRIMARY KEY,
    team_name VARCHAR NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS lookup.team_aliases (
    source VARCHAR NOT NULL,
    alias VARCHAR NOT NULL,
    team_id BIGINT NOT NULL,
    PRIMARY KEY (source, alias)
);
CREATE TABLE IF NOT EXISTS lookup.players (
    team_id BIGINT NOT NULL,
    player_name VARCHAR NOT NULL,
    jersey_number BIGINT,
    game_time VARCHAR,
    PRIMARY KEY (team_id, player_name)
);
";

/// One DuckDB database file serving as both the warehouse and the lookup store.
pub struct DuckDbConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open_with_flags(db_path, config)?
        };
        conn.execute_batch(LOOKUP_DDL)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, InfrastructureError> {
        self.conn.lock().map_err(|_| {
            InfrastructureError::Io(std::io::Error::other("DuckDB Mutex Poisoned"))
        })
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T, TouchlineError>
    where
        F: FnOnce(&mut Connection) -> Result<T, InfrastructureError>,
    {
        let mut conn = self.lock()?;
        Ok(f(&mut conn)?)
    }
}

// --- SQL HELPERS ---

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `schema.table` or `table` (schema `main`).
fn split_table(table: &str) -> (&str, &str) {
    table.split_once('.').unwrap_or(("main", table))
}

fn qualified(table: &str) -> String {
    let (schema, name) = split_table(table);
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Bool => "BOOLEAN",
        ColumnKind::Int => "BIGINT",
        ColumnKind::Float => "DOUBLE",
        ColumnKind::Timestamp => "TIMESTAMP",
        ColumnKind::Text | ColumnKind::Empty => "VARCHAR",
    }
}

fn to_value(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Bool(v) => Value::Boolean(*v),
        Cell::Int(v) => Value::BigInt(*v),
        Cell::Float(v) => Value::Double(*v),
        Cell::Text(v) => Value::Text(v.clone()),
        Cell::Timestamp(ts) => Value::Timestamp(TimeUnit::Microsecond, ts.timestamp_micros()),
    }
}

fn from_value(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Boolean(v) => Cell::Bool(v),
        Value::TinyInt(v) => Cell::Int(v.into()),
        Value::SmallInt(v) => Cell::Int(v.into()),
        Value::Int(v) => Cell::Int(v.into()),
        Value::BigInt(v) => Cell::Int(v),
        Value::UTinyInt(v) => Cell::Int(v.into()),
        Value::USmallInt(v) => Cell::Int(v.into()),
        Value::UInt(v) => Cell::Int(v.into()),
        Value::Float(v) => Cell::Float(v.into()),
        Value::Double(v) => Cell::Float(v),
        Value::Text(v) => Cell::Text(v),
        Value::Timestamp(unit, v) => {
            let micros = match unit {
                TimeUnit::Second => v.saturating_mul(1_000_000),
                TimeUnit::Millisecond => v.saturating_mul(1_000),
                TimeUnit::Microsecond => v,
                TimeUnit::Nanosecond => v / 1_000,
            };
            chrono::DateTime::<chrono::Utc>::from_timestamp_micros(micros)
                .map(Cell::Timestamp)
                .unwrap_or(Cell::Null)
        }
        other => Cell::Text(format!("{:?}", other)),
    }
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnSchema>, InfrastructureError> {
    let (schema, name) = split_table(table);
    let mut stmt = conn.prepare(
        "SELECT column_name, data_type, is_nullable
         FROM information_schema.columns
         WHERE table_schema = ? AND table_name = ?
         ORDER BY ordinal_position",
    )?;
    let rows = stmt.query_map(params![schema, name], |row| {
        Ok(ColumnSchema {
            name: row.get(0)?,
            data_type: row.get(1)?,
            is_nullable: row.get::<_, String>(2)? == "YES",
        })
    })?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

fn create_table(conn: &Connection, table: &str, rows: &Dataset) -> Result<(), InfrastructureError> {
    let (schema, _) = split_table(table);
    let columns: Vec<String> = rows
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} {}", quote_ident(c), sql_type(rows.column_kind(i))))
        .collect();
    conn.execute_batch(&format!(
        "CREATE SCHEMA IF NOT EXISTS {}; CREATE TABLE {} ({});",
        quote_ident(schema),
        qualified(table),
        columns.join(", ")
    ))?;
    info!(table, columns = columns.len(), "Table created");
    Ok(())
}

/// Adds the dataset columns the table does not have yet.
fn add_missing_columns(
    conn: &Connection,
    table: &str,
    existing: &[ColumnSchema],
    rows: &Dataset,
) -> Result<(), InfrastructureError> {
    for (i, column) in rows.columns().iter().enumerate() {
        let known = existing
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(column));
        if known {
            continue;
        }
        conn.execute_batch(&format!(
            "ALTER TABLE {} ADD COLUMN {} {};",
            qualified(table),
            quote_ident(column),
            sql_type(rows.column_kind(i))
        ))?;
        info!(table, column = column.as_str(), "New column added");
    }
    Ok(())
}

fn insert_rows(conn: &Connection, table: &str, rows: &Dataset) -> Result<usize, InfrastructureError> {
    if rows.is_empty() {
        return Ok(0);
    }
    let columns: Vec<String> = rows.columns().iter().map(|c| quote_ident(c)).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified(table),
        columns.join(", "),
        placeholders
    ))?;
    for row in rows.rows() {
        stmt.execute(params_from_iter(row.iter().map(to_value)))?;
    }
    Ok(rows.num_rows())
}

#[async_trait]
impl Warehouse for DuckDbConnector {
    #[instrument(skip(self, rows), fields(rows = rows.num_rows()))]
    async fn append(&self, table: &str, rows: &Dataset) -> Result<usize, TouchlineError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let existing = table_columns(&tx, table)?;
            if existing.is_empty() {
                create_table(&tx, table, rows)?;
            } else {
                add_missing_columns(&tx, table, &existing, rows)?;
            }
            let written = insert_rows(&tx, table, rows)?;
            tx.commit()?;
            debug!(table, written, "Rows appended");
            Ok(written)
        })
    }

    #[instrument(skip(self, rows), fields(rows = rows.num_rows()))]
    async fn replace(&self, table: &str, rows: &Dataset) -> Result<usize, TouchlineError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", qualified(table)))?;
            create_table(&tx, table, rows)?;
            let written = insert_rows(&tx, table, rows)?;
            tx.commit()?;
            Ok(written)
        })
    }

    async fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnSchema>, TouchlineError> {
        self.with_conn(|conn| table_columns(conn, table))
    }

    async fn preview(&self, table: &str, limit: usize) -> Result<Dataset, TouchlineError> {
        self.with_conn(|conn| {
            let columns = table_columns(conn, table)?;
            if columns.is_empty() {
                return Err(InfrastructureError::ObjectNotFound(format!("table {}", table)));
            }
            let mut stmt = conn.prepare(&format!(
                "SELECT * FROM {} LIMIT {}",
                qualified(table),
                limit
            ))?;
            let mut cursor = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = cursor.next()? {
                let mut cells = Vec::with_capacity(columns.len());
                for i in 0..columns.len() {
                    cells.push(from_value(row.get::<_, Value>(i)?));
                }
                out.push(cells);
            }
            Ok(Dataset::from_parts(
                columns.into_iter().map(|c| c.name).collect(),
                out,
            ))
        })
    }
}

#[async_trait]
impl LookupStore for DuckDbConnector {
    async fn team_id(&self, team_name: &str) -> Result<Option<i64>, TouchlineError> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT team_id FROM lookup.teams WHERE team_name = ?",
                    params![team_name],
                    |row| row.get(0),
                )
                .optional()?)
        })
    }

    async fn max_team_id(&self) -> Result<Option<i64>, TouchlineError> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT MAX(team_id) FROM lookup.teams", [], |row| {
                row.get::<_, Option<i64>>(0)
            })?)
        })
    }

    async fn insert_team(&self, team_id: i64, team_name: &str) -> Result<(), TouchlineError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO lookup.teams (team_id, team_name) VALUES (?, ?)",
                params![team_id, team_name],
            )?;
            Ok(())
        })
    }

    async fn put_alias(
        &self,
        source: TeamNameSource,
        alias: &str,
        team_id: i64,
    ) -> Result<(), TouchlineError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO lookup.team_aliases (source, alias, team_id) VALUES (?, ?, ?)",
                params![source.as_str(), alias, team_id],
            )?;
            Ok(())
        })
    }

    async fn resolve_alias(
        &self,
        source: TeamNameSource,
        alias: &str,
    ) -> Result<Option<i64>, TouchlineError> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT team_id FROM lookup.team_aliases WHERE source = ? AND alias = ?",
                    params![source.as_str(), alias],
                    |row| row.get(0),
                )
                .optional()?)
        })
    }

    async fn aliases(&self, source: TeamNameSource) -> Result<Vec<(String, i64)>, TouchlineError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT alias, team_id FROM lookup.team_aliases WHERE source = ? ORDER BY alias",
            )?;
            let rows = stmt.query_map(params![source.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    async fn put_player(&self, player: &PlayerRecord) -> Result<(), TouchlineError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO lookup.players (team_id, player_name, jersey_number, game_time)
                 VALUES (?, ?, ?, ?)",
                params![
                    player.team_id,
                    player.player_name,
                    player.jersey_number,
                    player.game_time
                ],
            )?;
            Ok(())
        })
    }

    async fn players(&self, team_id: i64) -> Result<Vec<PlayerRecord>, TouchlineError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT team_id, player_name, jersey_number, game_time
                 FROM lookup.players WHERE team_id = ? ORDER BY player_name",
            )?;
            let rows = stmt.query_map(params![team_id], |row| {
                Ok(PlayerRecord {
                    team_id: row.get(0)?,
                    player_name: row.get(1)?,
                    jersey_number: row.get(2)?,
                    game_time: row.get(3)?,
                })
            })?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn batch(columns: &[&str], rows: Vec<Vec<Cell>>) -> Dataset {
        Dataset::from_rows(columns.iter().copied(), rows).unwrap()
    }

    #[tokio::test]
    async fn test_append_creates_then_evolves_table() -> Result<()> {
        let db = DuckDbConnector::new(":memory:")?;
        let table = "players_stats.staging_stats_table";

        let first = batch(
            &["player", "min"],
            vec![vec!["Saka".into(), Cell::Int(90)]],
        );
        assert_eq!(db.append(table, &first).await?, 1);

        // A later file brings a new column; old rows get NULL there
        let second = batch(
            &["player", "min", "xg"],
            vec![vec!["Rice".into(), Cell::Int(85), Cell::Float(0.3)]],
        );
        assert_eq!(db.append(table, &second).await?, 1);

        let columns = db.fetch_columns(table).await?;
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["player", "min", "xg"]);
        assert_eq!(columns[1].data_type, "BIGINT");

        let preview = db.preview(table, 10).await?;
        assert_eq!(preview.num_rows(), 2);
        assert_eq!(preview.rows()[0][2], Cell::Null);
        assert_eq!(preview.rows()[1][2], Cell::Float(0.3));
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_truncates() -> Result<()> {
        let db = DuckDbConnector::new(":memory:")?;
        let table = "helpers.team_name_mapping";
        let rows = batch(
            &["team_name_market", "team_id"],
            vec![
                vec!["Arsenal FC".into(), Cell::Int(1)],
                vec!["Chelsea FC".into(), Cell::Int(2)],
            ],
        );
        db.replace(table, &rows).await?;
        db.replace(table, &rows).await?;
        assert_eq!(db.preview(table, 100).await?.num_rows(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_unknown_table() -> Result<()> {
        let db = DuckDbConnector::new(":memory:")?;
        assert!(db.fetch_columns("nope").await?.is_empty());
        assert!(db.preview("nope", 5).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_teams_are_unique() -> Result<()> {
        let db = DuckDbConnector::new(":memory:")?;
        assert_eq!(db.max_team_id().await?, None);

        db.insert_team(1, "Arsenal").await?;
        db.insert_team(2, "Chelsea").await?;
        assert_eq!(db.team_id("Chelsea").await?, Some(2));
        assert_eq!(db.max_team_id().await?, Some(2));

        // Same name or same id twice is refused
        assert!(db.insert_team(3, "Arsenal").await.is_err());
        assert!(db.insert_team(2, "Everton").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_aliases_can_be_overwritten() -> Result<()> {
        let db = DuckDbConnector::new(":memory:")?;
        db.insert_team(1, "Manchester Utd").await?;
        db.insert_team(2, "Manchester City").await?;

        db.put_alias(TeamNameSource::Market, "Manchester United", 2).await?;
        db.put_alias(TeamNameSource::Market, "Manchester United", 1).await?;

        assert_eq!(
            db.resolve_alias(TeamNameSource::Market, "Manchester United").await?,
            Some(1)
        );
        assert_eq!(
            db.resolve_alias(TeamNameSource::Stats, "Manchester United").await?,
            None
        );
        assert_eq!(db.aliases(TeamNameSource::Market).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_players_upsert() -> Result<()> {
        let db = DuckDbConnector::new(":memory:")?;
        let mut saka = PlayerRecord {
            team_id: 1,
            player_name: "Bukayo Saka".into(),
            jersey_number: Some(7),
            game_time: Some("90".into()),
        };
        db.put_player(&saka).await?;
        saka.game_time = Some("72".into());
        db.put_player(&saka).await?;

        let players = db.players(1).await?;
        assert_eq!(players, vec![saka]);
        Ok(())
    }

    #[test]
    fn test_qualified_names() {
        assert_eq!(
            qualified("players_stats.staging_stats_table"),
            "\"players_stats\".\"staging_stats_table\""
        );
        assert_eq!(qualified("t"), "\"main\".\"t\"");
    }
}
