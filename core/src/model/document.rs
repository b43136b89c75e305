use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Payslips,
    Contracts,
    Missions,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 3] = [
        DocumentCategory::Payslips,
        DocumentCategory::Contracts,
        DocumentCategory::Missions,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            DocumentCategory::Payslips => "payslips",
            DocumentCategory::Contracts => "contracts",
            DocumentCategory::Missions => "missions",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentCategory::Payslips => "💰 Fiches de paie",
            DocumentCategory::Contracts => "📝 Contrats",
            DocumentCategory::Missions => "🎯 Missions",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub category: DocumentCategory,
    pub date: NaiveDate,
    pub size: String,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub signed: bool,
}

/// Documents shared with the demo consultant, newest first.
pub fn demo_documents() -> Vec<Document> {
    let doc = |id: &str, name: &str, category, (y, m, d), size: &str, is_new, signed| {
        NaiveDate::from_ymd_opt(y, m, d).map(|date| Document {
            id: id.to_string(),
            name: name.to_string(),
            category,
            date,
            size: size.to_string(),
            is_new,
            signed,
        })
    };
    let mut documents: Vec<Document> = [
        doc("doc-1", "Fiche de paie - Janvier 2025", DocumentCategory::Payslips, (2025, 1, 31), "245 KB", true, false),
        doc("doc-2", "Fiche de paie - Décembre 2024", DocumentCategory::Payslips, (2024, 12, 31), "242 KB", false, false),
        doc("doc-3", "Contrat CDI", DocumentCategory::Contracts, (2024, 1, 15), "1.2 MB", false, true),
        doc("doc-4", "Ordre de mission - BGL", DocumentCategory::Missions, (2024, 1, 15), "89 KB", false, false),
    ]
    .into_iter()
    .flatten()
    .collect();
    documents.sort_by(|a, b| b.date.cmp(&a.date));
    documents
}

/// Case-insensitive name search within an optional category.
pub fn filter_documents<'a>(
    documents: &'a [Document],
    category: Option<DocumentCategory>,
    search: &str,
) -> Vec<&'a Document> {
    let needle = search.trim().to_lowercase();
    documents
        .iter()
        .filter(|d| category.is_none_or(|c| d.category == c))
        .filter(|d| d.name.to_lowercase().contains(&needle))
        .collect()
}
