//! Fallback collection served when nothing valid is stored.

use crate::models::Tribute;

/// The two built-in example tributes.
pub fn mock_tributes() -> Vec<Tribute> {
    vec![
        Tribute {
            id: "1".to_string(),
            name: "Jane Doe".to_string(),
            birth_date: Some("1950-01-01".to_string()),
            death_date: Some("2024-05-12".to_string()),
            bio: Some("A kind and loving person remembered forever.".to_string()),
            photo_url: Some("/placeholder.jpg".to_string()),
            created_by: Some("mock-user-1".to_string()),
            ..Default::default()
        },
        Tribute {
            id: "2".to_string(),
            name: "John Smith".to_string(),
            birth_date: Some("1945-03-22".to_string()),
            death_date: Some("2023-11-04".to_string()),
            bio: Some("A life well lived.".to_string()),
            photo_url: Some("/placeholder.jpg".to_string()),
            created_by: Some("mock-user-2".to_string()),
            ..Default::default()
        },
    ]
}
