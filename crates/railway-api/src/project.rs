use serde::{Deserialize, Deserializer, Serialize};

use crate::client::{ApiError, RailwayClient};

const PROJECT_QUERY: &str = r#"query project($id: String!) {
  project(id: $id) {
    id
    name
    description
    createdAt
    services {
      edges {
        node {
          id
          name
          createdAt
        }
      }
    }
  }
}"#;

// --- Response types ---

/// A Railway project and the services it contains.
///
/// Every field is optional on the wire; display code supplies placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: ServiceConnection,
}

/// Relay-style connection wrapping the project's services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConnection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<ServiceEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEdge {
    #[serde(default, deserialize_with = "null_as_default")]
    pub node: Service,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Project {
    /// Services in the order the API returned them.
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.edges.iter().map(|edge| &edge.node)
    }

    pub fn service_count(&self) -> usize {
        self.services.edges.len()
    }
}

#[derive(Serialize)]
struct ProjectVariables<'a> {
    id: &'a str,
}

#[derive(Deserialize)]
struct ProjectData {
    #[serde(default)]
    project: Option<Project>,
}

impl RailwayClient {
    /// Fetch a project and its services by id.
    ///
    /// Requires a bearer token; without one this returns
    /// [`ApiError::MissingCredentials`] and sends nothing. A null `project`
    /// in an otherwise clean response is returned as `Ok(None)`.
    pub async fn project(&self, id: &str) -> Result<Option<Project>, ApiError> {
        if !self.is_authenticated() {
            return Err(ApiError::MissingCredentials);
        }
        let variables = ProjectVariables { id };
        let data: Option<ProjectData> = self.query(PROJECT_QUERY, Some(&variables)).await?;
        Ok(data.and_then(|d| d.project))
    }
}
