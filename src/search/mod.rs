//! Tantivy-based search index module.
//!
//! Provides full-text lookup of tributes with field boosting.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{BooleanQuery, BoostQuery, Occur, Query, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Tribute;

/// Field boost values.
const BOOST_NAME: f32 = 10.0;
const BOOST_TAGS: f32 = 6.0;
const BOOST_BIO: f32 = 5.0;
const BOOST_OBITUARY: f32 = 4.0;
const BOOST_STORY: f32 = 3.0;
const BOOST_QUOTE: f32 = 2.0;

/// Writer heap budget.
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Search result with tribute id and relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub tribute_id: String,
    pub score: f32,
}

/// One page of hits plus the number of matches across all pages.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub hits: Vec<SearchResult>,
    pub total: usize,
}

/// Search index schema fields.
struct SearchFields {
    tribute_id: Field,
    name: Field,
    bio: Field,
    story: Field,
    obituary: Field,
    quote: Field,
    tags: Field,
}

impl SearchFields {
    fn build() -> (Schema, Self) {
        let mut schema_builder = Schema::builder();
        let fields = Self {
            tribute_id: schema_builder.add_text_field("tribute_id", STRING | STORED),
            name: schema_builder.add_text_field("name", TEXT | STORED),
            bio: schema_builder.add_text_field("bio", TEXT),
            story: schema_builder.add_text_field("story", TEXT),
            obituary: schema_builder.add_text_field("obituary", TEXT),
            quote: schema_builder.add_text_field("quote", TEXT),
            tags: schema_builder.add_text_field("tags", TEXT),
        };
        (schema_builder.build(), fields)
    }

    fn boosted(&self) -> [(Field, f32); 6] {
        [
            (self.name, BOOST_NAME),
            (self.tags, BOOST_TAGS),
            (self.bio, BOOST_BIO),
            (self.obituary, BOOST_OBITUARY),
            (self.story, BOOST_STORY),
            (self.quote, BOOST_QUOTE),
        ]
    }
}

/// Tantivy search index for tributes.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        let (schema, fields) = SearchFields::build();

        // Try to open existing index or create new one
        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        Self::with_index(index, fields)
    }

    /// Index held entirely in memory, for the memory storage medium.
    pub fn in_memory() -> Result<Self, AppError> {
        let (schema, fields) = SearchFields::build();
        Self::with_index(Index::create_in_ram(schema), fields)
    }

    fn with_index(index: Index, fields: SearchFields) -> Result<Self, AppError> {
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(WRITER_HEAP_BYTES)
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from tributes.
    pub async fn rebuild(&self, tributes: &[Tribute]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_all_documents()?;
        for tribute in tributes {
            writer.add_document(self.create_document(tribute))?;
        }
        writer.commit()?;

        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} tributes", tributes.len());
        Ok(())
    }

    /// Index a single tribute, replacing any earlier version.
    pub async fn index_tribute(&self, tribute: &Tribute) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_term(Term::from_field_text(self.fields.tribute_id, &tribute.id));
        writer.add_document(self.create_document(tribute))?;
        writer.commit()?;

        self.reader.reload()?;
        Ok(())
    }

    /// Remove a tribute from the index.
    pub async fn remove_tribute(&self, tribute_id: &str) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_term(Term::from_field_text(self.fields.tribute_id, tribute_id));
        writer.commit()?;

        self.reader.reload()?;
        Ok(())
    }

    /// Search for tributes matching the query.
    ///
    /// A `limit` of zero still reports `total` but returns no hits.
    pub fn search(
        &self,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchPage, AppError> {
        if query_str.trim().is_empty() {
            return Ok(SearchPage::default());
        }

        let searcher = self.reader.searcher();

        let field_queries = self.fields.boosted();
        let all_fields = field_queries.iter().map(|(field, _)| *field).collect();
        let base_query = QueryParser::for_index(&self.index, all_fields)
            .parse_query(query_str)
            .map_err(|e| AppError::Validation(format!("Invalid search query: {}", e)))?;

        let subqueries: Vec<(Occur, Box<dyn Query>)> = field_queries
            .into_iter()
            .filter_map(|(field, boost)| {
                let field_query = QueryParser::for_index(&self.index, vec![field])
                    .parse_query(query_str)
                    .ok()?;
                Some((
                    Occur::Should,
                    Box::new(BoostQuery::new(field_query, boost)) as Box<dyn Query>,
                ))
            })
            .collect();

        let combined_query = if subqueries.is_empty() {
            base_query
        } else {
            Box::new(BooleanQuery::new(subqueries))
        };

        // TopDocs rejects a zero limit and preallocates its window
        let num_docs = usize::try_from(searcher.num_docs()).unwrap_or(usize::MAX);
        if limit == 0 || offset >= num_docs {
            let total = searcher
                .search(&combined_query, &Count)
                .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;
            return Ok(SearchPage {
                hits: Vec::new(),
                total,
            });
        }

        let window = limit.saturating_add(offset).min(num_docs);
        let (total, top_docs) = searcher
            .search(&combined_query, &(Count, TopDocs::with_limit(window)))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let hits = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let tribute_id = doc.get_first(self.fields.tribute_id)?.as_str()?.to_string();
                Some(SearchResult { tribute_id, score })
            })
            .collect();

        Ok(SearchPage { hits, total })
    }

    fn create_document(&self, tribute: &Tribute) -> TantivyDocument {
        doc!(
            self.fields.tribute_id => tribute.id.clone(),
            self.fields.name => tribute.name.clone(),
            self.fields.bio => tribute.bio.clone().unwrap_or_default(),
            self.fields.story => tribute.story.clone().unwrap_or_default(),
            self.fields.obituary => tribute.obituary_text.clone().unwrap_or_default(),
            self.fields.quote => tribute.quote.clone().unwrap_or_default(),
            self.fields.tags => tribute.tags.join(" ")
        )
    }
}
