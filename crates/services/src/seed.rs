//! Sample catalog installed into an empty store.

use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::category_service::{CategoryDraft, CategoryService};
use crate::error::CatalogError;
use crate::question_service::{QuestionDraft, QuestionService};
use crate::test_service::{TestDraft, TestService};

const CATEGORIES: [(&str, &str); 6] = [
    (
        "Current Affairs",
        "Stay updated with the latest events and news around the world.",
    ),
    (
        "General Knowledge",
        "Test your awareness about various general topics and trivia.",
    ),
    (
        "Science & Technology",
        "Explore the world of science and technological advancements.",
    ),
    (
        "History",
        "Journey through important historical events and facts.",
    ),
    (
        "Sports",
        "Challenge your knowledge about various sports and athletes.",
    ),
    (
        "Entertainment",
        "Test your knowledge of movies, music, and pop culture.",
    ),
];

/// `(name, category position, minutes)`
const TESTS: [(&str, usize, i64); 6] = [
    ("Weekly Current Affairs: August 1-7, 2023", 0, 15),
    ("International Relations Quiz", 0, 20),
    ("Economic Policies & Developments", 0, 12),
    ("Global Leaders & Politics", 0, 18),
    ("General Science Quiz", 2, 15),
    ("Technology Innovations 2023", 2, 20),
];

struct SampleQuestion {
    test: usize,
    text: &'static str,
    options: [&'static str; 4],
    correct_option: i64,
    explanation: &'static str,
}

const QUESTIONS: [SampleQuestion; 4] = [
    SampleQuestion {
        test: 0,
        text: "Which country hosted the G7 Summit in 2023?",
        options: ["United States", "Japan", "Germany", "Italy"],
        correct_option: 1,
        explanation: "The G7 Summit was held in Hiroshima, Japan in May 2023.",
    },
    SampleQuestion {
        test: 0,
        text: "Which technology company announced its 'Copilot' AI assistant in 2023?",
        options: ["Google", "Apple", "Microsoft", "Meta"],
        correct_option: 2,
        explanation: "Microsoft announced its 'Copilot' AI assistant for various products in 2023.",
    },
    SampleQuestion {
        test: 0,
        text: "Which country became the fourth nation to land on the moon in August 2023?",
        options: ["China", "India", "Israel", "United Arab Emirates"],
        correct_option: 1,
        explanation: "India became the fourth country to successfully land on the moon with its Chandrayaan-3 mission.",
    },
    SampleQuestion {
        test: 1,
        text: "Which organization oversees international trade regulations?",
        options: ["IMF", "World Bank", "WTO", "UNICEF"],
        correct_option: 2,
        explanation: "The World Trade Organization (WTO) is responsible for regulating international trade.",
    },
];

/// Counts of rows written by [`seed_sample_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub tests: usize,
    pub questions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(SeedReport),
    /// The store already had categories; nothing was written.
    Skipped,
}

/// Install the sample catalog unless the store already holds any category.
///
/// # Errors
///
/// Returns `CatalogError` if validation or persistence of a sample row fails.
pub async fn seed_sample_catalog(
    storage: &Storage,
    clock: Clock,
) -> Result<SeedOutcome, CatalogError> {
    let categories = CategoryService::new(storage.categories.clone());
    if !categories.list_categories().await?.is_empty() {
        info!("catalog already populated, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }
    let tests = TestService::new(clock, storage.categories.clone(), storage.tests.clone());
    let questions = QuestionService::new(storage.tests.clone(), storage.questions.clone());

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let category = categories
            .create_category(CategoryDraft {
                name: name.to_owned(),
                description: description.to_owned(),
            })
            .await?;
        category_ids.push(category.id());
    }

    let mut test_ids = Vec::with_capacity(TESTS.len());
    for (name, category, minutes) in TESTS {
        let test = tests
            .create_test(TestDraft {
                name: name.to_owned(),
                category_id: category_ids[category],
                time_limit: Some(minutes),
            })
            .await?;
        test_ids.push(test.id());
    }

    for sample in &QUESTIONS {
        questions
            .create_question(QuestionDraft {
                test_id: test_ids[sample.test],
                text: sample.text.to_owned(),
                options: sample.options.iter().map(|o| (*o).to_owned()).collect(),
                correct_option: sample.correct_option,
                explanation: Some(sample.explanation.to_owned()),
            })
            .await?;
    }

    let report = SeedReport {
        categories: category_ids.len(),
        tests: test_ids.len(),
        questions: QUESTIONS.len(),
    };
    info!(
        categories = report.categories,
        tests = report.tests,
        questions = report.questions,
        "sample catalog seeded"
    );
    Ok(SeedOutcome::Seeded(report))
}
