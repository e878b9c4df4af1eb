//! Test doubles shared by driver tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::traits::QueryExecutor;
use crate::error::Result;

/// A statement seen by [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Vec<String>,
}

/// Executor that records every call and answers scalar queries with a
/// fixed value.
pub struct RecordingExecutor {
    db_type: &'static str,
    scalar: i64,
    calls: Mutex<Vec<Call>>,
}

impl RecordingExecutor {
    pub fn new(db_type: &'static str, scalar: i64) -> Self {
        Self {
            db_type,
            scalar,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Call {
        self.calls().pop().expect("no calls recorded")
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn query_scalar_int(&self, sql: &str, params: &[&str]) -> Result<i64> {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        });
        Ok(self.scalar)
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            params: Vec::new(),
        });
        Ok(())
    }

    fn db_type(&self) -> &str {
        self.db_type
    }
}
