//! Shared fixtures for the crate's unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use mcpdash_api::{ApiError, ServerApi};
use mcpdash_types::{NewServer, ServerRecord, ServerUpdate, Session};
use ratatui::buffer::Buffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    List,
    Delete(String),
    Create(NewServer),
    Update(ServerUpdate),
}

/// In-memory [`ServerApi`] that records every call.
#[derive(Debug, Default)]
pub struct FakeServerApi {
    records: Mutex<Vec<ServerRecord>>,
    calls: Mutex<Vec<FakeCall>>,
    fail_deletes: bool,
    fail_lists: bool,
}

impl FakeServerApi {
    pub fn with_records(records: Vec<ServerRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn failing_lists(mut self) -> Self {
        self.fail_lists = true;
        self
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record_call(&self, call: FakeCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl ServerApi for FakeServerApi {
    async fn list_servers(&self, _credential: &str) -> Result<Vec<ServerRecord>, ApiError> {
        self.record_call(FakeCall::List);
        if self.fail_lists {
            return Err(ApiError::Status {
                status: 500,
                message: "internal error".into(),
            });
        }
        Ok(self.records.lock().expect("records lock").clone())
    }

    async fn delete_server(&self, _credential: &str, server_id: &str) -> Result<(), ApiError> {
        self.record_call(FakeCall::Delete(server_id.to_string()));
        if self.fail_deletes {
            return Err(ApiError::Status {
                status: 403,
                message: "forbidden".into(),
            });
        }
        self.records.lock().expect("records lock").retain(|record| record.id != server_id);
        Ok(())
    }

    async fn create_server(&self, _credential: &str, server: &NewServer) -> Result<ServerRecord, ApiError> {
        self.record_call(FakeCall::Create(server.clone()));
        let mut records = self.records.lock().expect("records lock");
        let created = ServerRecord {
            id: format!("srv-new-{}", records.len()),
            name: server.alias.clone(),
            description: server.description.clone(),
            transport_kind: server.transport.clone(),
            auth_kind: server.auth_type.clone(),
            endpoint_url: server.url.clone(),
            ..ServerRecord::default()
        };
        records.push(created.clone());
        Ok(created)
    }

    async fn update_server(&self, _credential: &str, update: &ServerUpdate) -> Result<ServerRecord, ApiError> {
        self.record_call(FakeCall::Update(update.clone()));
        let mut records = self.records.lock().expect("records lock");
        let record = records
            .iter_mut()
            .find(|record| record.id == update.server_id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "not found".into(),
            })?;
        record.name = update.alias.clone();
        record.description = update.description.clone();
        record.transport_kind = update.transport.clone();
        record.auth_kind = update.auth_type.clone();
        record.endpoint_url = update.url.clone();
        Ok(record.clone())
    }
}

pub fn record(id: &str) -> ServerRecord {
    ServerRecord {
        id: id.to_string(),
        name: Some(format!("{id} name")),
        endpoint_url: format!("https://mcp.example.com/{id}/mcp"),
        ..ServerRecord::default()
    }
}

pub fn admin_session() -> Session {
    Session::new(Some("sk-test".into()), Some("proxy_admin".into()), Some("user-1".into()))
}

pub fn viewer_session() -> Session {
    Session::new(Some("sk-test".into()), Some("internal_user_viewer".into()), Some("user-2".into()))
}

/// Rendered buffer as one string per row.
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    (0..buffer.area.height)
        .map(|y| (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}
