use serde::{Deserialize, Serialize};

use crate::client::{ApiError, RailwayClient};

const VIEWER_QUERY: &str = "query { me { id email } }";

/// Identity of the account the token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct ViewerData {
    #[serde(default)]
    me: Option<Viewer>,
}

impl RailwayClient {
    /// Run the `me` query.
    ///
    /// A 200 response without an `errors` array is a success even when `me`
    /// comes back null; the caller only learns that the API answered cleanly.
    pub async fn viewer(&self) -> Result<Option<Viewer>, ApiError> {
        let data: Option<ViewerData> = self.query(VIEWER_QUERY, None::<&()>).await?;
        Ok(data.and_then(|d| d.me))
    }
}
