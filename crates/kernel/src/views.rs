use serde_json::Value;

/// Render contract consumed by controllers: a view name plus named data in,
/// HTML out. Controllers never inspect the markup.
pub trait Views: Send + Sync {
    fn render(&self, view: &str, data: &Value) -> anyhow::Result<String>;
}
