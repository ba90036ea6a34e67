use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct NextRequest {
    /// `None` when the page only wants the item on screen.
    #[serde(default)]
    pub liked: Option<bool>,
}
