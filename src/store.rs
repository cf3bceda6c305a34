//! record store
//!
//! persistence collaborator for endpoint configs, groups, and
//! generated schema records. the store is an injected [`Repository`]
//! implementation passed through constructors, never a module-level
//! singleton. [`MemoryRepository`] is the in-process default.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// one endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub id: String,
    pub name: String,
    /// graphql endpoint urls, merged in list order
    pub urls: Vec<String>,
    /// local repository path generated files land in
    pub registry_path: String,
    /// import-source identifier
    pub import_source: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

/// a named collection of schema records under one config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    pub path: String,
    pub config_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// one generated operation with its types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub id: String,
    pub name: String,
    /// localized display name
    pub display_name: String,
    pub group_id: String,
    pub config_id: String,
    /// exported operation constant
    pub operation_code: String,
    /// generated type declarations
    pub types_code: String,
    pub created_at: String,
    pub updated_at: String,
}

/// crud over the three record kinds
pub trait Repository {
    fn create_config(&mut self, record: ConfigRecord) -> Result<()>;
    fn get_config(&self, id: &str) -> Option<ConfigRecord>;
    fn update_config(&mut self, record: ConfigRecord) -> Result<()>;
    fn delete_config(&mut self, id: &str) -> Result<()>;
    fn list_configs(&self) -> Vec<ConfigRecord>;

    fn create_group(&mut self, record: GroupRecord) -> Result<()>;
    fn get_group(&self, id: &str) -> Option<GroupRecord>;
    fn update_group(&mut self, record: GroupRecord) -> Result<()>;
    fn delete_group(&mut self, id: &str) -> Result<()>;
    /// groups owned by one config, sorted by name
    fn list_groups(&self, config_id: &str) -> Vec<GroupRecord>;

    fn create_schema(&mut self, record: SchemaRecord) -> Result<()>;
    fn get_schema(&self, id: &str) -> Option<SchemaRecord>;
    fn update_schema(&mut self, record: SchemaRecord) -> Result<()>;
    fn delete_schema(&mut self, id: &str) -> Result<()>;
    /// schema records owned by one group
    fn list_schemas(&self, group_id: &str) -> Vec<SchemaRecord>;
}

/// in-memory repository
#[derive(Debug, Default)]
pub struct MemoryRepository {
    configs: BTreeMap<String, ConfigRecord>,
    groups: BTreeMap<String, GroupRecord>,
    schemas: BTreeMap<String, SchemaRecord>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(kind: &str, id: &str) -> Error {
    Error::Config(format!("no {kind} record with id {id}"))
}

impl Repository for MemoryRepository {
    fn create_config(&mut self, record: ConfigRecord) -> Result<()> {
        self.configs.insert(record.id.clone(), record);
        Ok(())
    }

    fn get_config(&self, id: &str) -> Option<ConfigRecord> {
        self.configs.get(id).cloned()
    }

    fn update_config(&mut self, record: ConfigRecord) -> Result<()> {
        if !self.configs.contains_key(&record.id) {
            return Err(missing("config", &record.id));
        }
        self.configs.insert(record.id.clone(), record);
        Ok(())
    }

    fn delete_config(&mut self, id: &str) -> Result<()> {
        self.configs
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| missing("config", id))
    }

    fn list_configs(&self) -> Vec<ConfigRecord> {
        self.configs.values().cloned().collect()
    }

    fn create_group(&mut self, record: GroupRecord) -> Result<()> {
        self.groups.insert(record.id.clone(), record);
        Ok(())
    }

    fn get_group(&self, id: &str) -> Option<GroupRecord> {
        self.groups.get(id).cloned()
    }

    fn update_group(&mut self, record: GroupRecord) -> Result<()> {
        if !self.groups.contains_key(&record.id) {
            return Err(missing("group", &record.id));
        }
        self.groups.insert(record.id.clone(), record);
        Ok(())
    }

    fn delete_group(&mut self, id: &str) -> Result<()> {
        self.groups
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| missing("group", id))
    }

    fn list_groups(&self, config_id: &str) -> Vec<GroupRecord> {
        let mut groups: Vec<GroupRecord> = self
            .groups
            .values()
            .filter(|group| group.config_id == config_id)
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        groups
    }

    fn create_schema(&mut self, record: SchemaRecord) -> Result<()> {
        self.schemas.insert(record.id.clone(), record);
        Ok(())
    }

    fn get_schema(&self, id: &str) -> Option<SchemaRecord> {
        self.schemas.get(id).cloned()
    }

    fn update_schema(&mut self, record: SchemaRecord) -> Result<()> {
        if !self.schemas.contains_key(&record.id) {
            return Err(missing("schema", &record.id));
        }
        self.schemas.insert(record.id.clone(), record);
        Ok(())
    }

    fn delete_schema(&mut self, id: &str) -> Result<()> {
        self.schemas
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| missing("schema", id))
    }

    fn list_schemas(&self, group_id: &str) -> Vec<SchemaRecord> {
        self.schemas
            .values()
            .filter(|schema| schema.group_id == group_id)
            .cloned()
            .collect()
    }
}
