///! Reference report: $500,000 condo in Quintana Roo bought by a foreign buyer

use sensei_common::{LineItem, ReportInput, SummaryField};

pub fn sample_input() -> ReportInput {
    ReportInput {
        purchase_summary: vec![
            SummaryField::new("Purchase Price", "$500,000 USD"),
            SummaryField::new("Type", "Condo"),
            SummaryField::new("State", "Quintana Roo"),
            SummaryField::new("Restricted Zone", "Yes"),
            SummaryField::new("Foreign Buyer", "Yes"),
        ],
        addons: vec![
            "Title Insurance".to_string(),
            "Home Inspection".to_string(),
            "Attorney".to_string(),
            "Translator".to_string(),
            "Closing Coordinator".to_string(),
        ],
        line_items: vec![
            LineItem::new("ISAI 3%", 15000.0, 15000.0, "% of purchase price"),
            LineItem::new("Notarial Fees", 3000.0, 4500.0, "Range"),
            LineItem::new("Registration", 1500.0, 2500.0, ""),
            LineItem::new("Escrow", 750.0, 750.0, "Flat fee"),
            LineItem::new("Certificates", 40.0, 60.0, ""),
            LineItem::new("Appraisal", 500.0, 2500.0, ""),
            LineItem::new("Fideicomiso Setup", 1000.0, 2000.0, "If restricted + foreign"),
            LineItem::new("Fideicomiso Permit", 1100.0, 1100.0, "One-time fee"),
            LineItem::new("Fideicomiso Annual", 500.0, 800.0, "Recurring"),
            LineItem::new("Title Insurance", 1500.0, 1500.0, ""),
            LineItem::new("Home Inspection", 500.0, 500.0, ""),
            LineItem::new("Attorney", 2500.0, 2500.0, ""),
            LineItem::new("Translator", 500.0, 500.0, ""),
            LineItem::new("Closing Coordinator", 750.0, 750.0, ""),
        ],
        estimate_min: 29140.0,
        estimate_max: 34960.0,
        effective_min_pct: 5.8,
        effective_max_pct: 7.0,
        prepared_date: Some("12/1/2025".to_string()),
        sponsor_text: None,
    }
}
