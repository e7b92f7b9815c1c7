use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::plan::PlanResult;

#[derive(Debug, Error)]
#[error("document export failed: {0}")]
pub struct ExportError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    Letter,
    A4,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub page_size: PageSize,
    pub margin_in: f64,
    pub image_quality: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin_in: 0.5,
            image_quality: 0.98,
        }
    }
}

/// Consumes rendered plan text and produces a downloadable document. The
/// real PDF engine lives outside this service; the engine only supplies the
/// content.
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(&self, content: &str, options: &ExportOptions) -> Result<Vec<u8>, ExportError>;
}

/// Passes the rendered markdown through as UTF-8 bytes.
pub struct PlainTextExporter;

#[async_trait]
impl DocumentExporter for PlainTextExporter {
    async fn export(
        &self,
        content: &str,
        _options: &ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        Ok(content.as_bytes().to_vec())
    }
}

/// Flattens the plan into the document body the exporter consumes.
pub fn render_markdown(plan: &PlanResult, budget: Option<f64>) -> String {
    let mut doc = String::new();
    doc.push_str("# Your Meal Plan\n\n");
    doc.push_str(&plan.plan_summary);
    doc.push_str("\n\n");

    if let Some(budget) = budget {
        if plan.total_cost > budget {
            doc.push_str(&format!(
                "**Note: This plan exceeds your specified budget of ${budget}, but it's the \
                 most affordable option found that meets your nutritional goals.**\n\n"
            ));
        }
    }

    doc.push_str(&format!(
        "## Grocery List (Total Est: ${:.2})\n\n",
        plan.total_cost
    ));
    for item in &plan.grocery_list {
        doc.push_str(&format!(
            "- {} ({}) - ${:.2}\n",
            item.name, item.quantity, item.price
        ));
    }

    doc.push_str("\n## Instructions\n\n");
    doc.push_str(&plan.instructions);
    doc.push_str("\n\n## Nutrition Info (Est. per day)\n\n");
    doc.push_str(&plan.nutrition);
    doc.push('\n');
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::GroceryItem;

    fn plan() -> PlanResult {
        PlanResult {
            plan_summary: "A lean week.".into(),
            grocery_list: vec![GroceryItem {
                id: "ing-1".into(),
                name: "Salmon".into(),
                quantity: "2 lbs".into(),
                price: 18.99,
            }],
            instructions: "### Dinner\nRoast it.".into(),
            nutrition: "### Total\n1800 kcal".into(),
            total_cost: 42.5,
        }
    }

    #[test]
    fn rendered_document_contains_all_sections() {
        let doc = render_markdown(&plan(), None);
        assert!(doc.contains("A lean week."));
        assert!(doc.contains("## Grocery List (Total Est: $42.50)"));
        assert!(doc.contains("- Salmon (2 lbs) - $18.99"));
        assert!(doc.contains("## Instructions"));
        assert!(doc.contains("## Nutrition Info (Est. per day)"));
        assert!(!doc.contains("exceeds your specified budget"));
    }

    #[test]
    fn over_budget_note_appears_when_budget_exceeded() {
        let doc = render_markdown(&plan(), Some(40.0));
        assert!(doc.contains("exceeds your specified budget of $40"));
        let doc = render_markdown(&plan(), Some(50.0));
        assert!(!doc.contains("exceeds your specified budget"));
    }

    #[tokio::test]
    async fn plain_text_exporter_passes_content_through() {
        let bytes = PlainTextExporter
            .export("hello", &ExportOptions::default())
            .await
            .unwrap();
        assert_eq!(bytes, b"hello");
    }
}
