use tracing::{debug, info};

use crate::{
    error::Result,
    language::{CreateLanguage, LanguageStore},
};

/// Initial content of empty store, as (name, description), inserted in this order
pub const SEED_LANGUAGES: [(&str, &str); 20] = [
    (
        "Python",
        "General-purpose programming language known for its readability.",
    ),
    (
        "JavaScript",
        "High-level, interpreted scripting language for web development.",
    ),
    ("Java", "Popular object-oriented programming language."),
    ("C#", "Modern programming language developed by Microsoft."),
    (
        "C++",
        "General-purpose programming language with a focus on performance.",
    ),
    ("PHP", "Server-side scripting language for web development."),
    (
        "Swift",
        "Programming language developed by Apple for iOS/macOS app development.",
    ),
    ("Ruby", "Dynamic, object-oriented programming language."),
    (
        "Rust",
        "Systems programming language with a focus on safety and performance.",
    ),
    (
        "Go",
        "Open-source programming language designed for concurrency and efficiency.",
    ),
    (
        "Kotlin",
        "Modern programming language that runs on the Java Virtual Machine (JVM).",
    ),
    (
        "TypeScript",
        "Superset of JavaScript that adds optional static typing.",
    ),
    ("SQL", "Language for managing and querying relational databases."),
    ("Perl", "High-level, general-purpose programming language."),
    (
        "Scala",
        "Modern programming language that combines functional and object-oriented programming.",
    ),
    (
        "Lua",
        "Scripting language designed for embedded use in applications.",
    ),
    (
        "Objective-C",
        "Programming language used for iOS/macOS app development.",
    ),
    (
        "Haskell",
        "Purely functional programming language with strong static typing.",
    ),
    (
        "Dart",
        "Programming language developed by Google for building mobile, web, and desktop apps.",
    ),
    (
        "COBOL",
        "Business-oriented programming language often used for legacy systems.",
    ),
];

/// Fills store with [`SEED_LANGUAGES`] if it contains no records.
/// Records are inserted all at once, partial seed is never left behind.
/// Returns number of inserted records.
pub async fn seed_if_empty<S: LanguageStore>(store: &S) -> Result<usize> {
    let existing = store.count().await?;
    if existing > 0 {
        debug!("Store already contains {existing} languages, skipping seed");
        return Ok(0);
    }

    let payloads = SEED_LANGUAGES
        .iter()
        .map(|(name, description)| CreateLanguage {
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect();
    let inserted = store.create_many(payloads).await?.len();
    info!("Seeded store with {inserted} languages");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ListingParams, MemoryLanguageStore};

    #[tokio::test]
    async fn test_seed_once() {
        let store = MemoryLanguageStore::new();
        assert_eq!(20, seed_if_empty(&store).await.unwrap());
        assert_eq!(0, seed_if_empty(&store).await.unwrap());
        assert_eq!(20, store.count().await.unwrap());

        let go = store.get(10).await.unwrap();
        assert_eq!("Go", go.name);
    }

    #[tokio::test]
    async fn test_concurrency_unique_in_seed() {
        let store = MemoryLanguageStore::new();
        seed_if_empty(&store).await.unwrap();
        let batch = store
            .list(ListingParams::new(0, 10).with_filter("concurrency"))
            .await
            .unwrap();
        assert_eq!(1, batch.total);
        assert_eq!("Go", batch.rows[0].name);
    }
}
