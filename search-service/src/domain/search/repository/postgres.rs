//! PostgreSQL repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::search::composer::{escape_like, TermFilter, TextMatch};
use crate::domain::search::ranking::PageRequest;
use crate::domain::search::traits::{Result, TermRepository};
use crate::domain::search::types::{
    FacetCount, Facets, Page, PopularityFormula, SortMode, Suggestion, Term, TermHit, TermId,
    VoteTally,
};

const TERM_COLUMNS: &str = r#"
    SELECT
        t.id,
        t.term,
        t.language,
        t.domain,
        t.definition,
        t.owner_id,
        COALESCE(v.upvotes, 0) AS upvotes,
        COALESCE(v.downvotes, 0) AS downvotes"#;

/// Vote counts per term, grouped once and joined onto the term rows.
const WITH_VOTES: &str = r#"
    FROM terms t
    LEFT JOIN (
        SELECT
            term_id,
            COUNT(*) FILTER (WHERE vote_type = 'upvote') AS upvotes,
            COUNT(*) FILTER (WHERE vote_type = 'downvote') AS downvotes
        FROM votes
        GROUP BY term_id
    ) v ON v.term_id = t.id
    WHERE TRUE"#;

/// PostgreSQL-backed term repository.
///
/// Reads from the `terms` and `votes` tables owned by the term and vote
/// services. All queries are composed at runtime with [`QueryBuilder`].
#[derive(Clone)]
pub struct PgTermRepository {
    pool: PgPool,
}

impl PgTermRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the candidate query for `filter`.
///
/// A fuzzy text match is not expressed in SQL; the caller filters the rows.
pub(crate) fn candidates_query(filter: &TermFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(TERM_COLUMNS);
    builder.push(WITH_VOTES);
    push_predicates(&mut builder, filter);

    builder.push(" ORDER BY t.id");
    builder
}

/// Build the query for one ranked page.
///
/// `total` is the match count before `LIMIT`, taken with a window function so
/// the page and its total come back in the same round trip.
pub(crate) fn ranked_page_query(
    filter: &TermFilter,
    sort: SortMode,
    popularity: PopularityFormula,
    page: &PageRequest,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(TERM_COLUMNS);
    builder.push(", COUNT(*) OVER () AS total");
    builder.push(WITH_VOTES);
    push_predicates(&mut builder, filter);

    builder.push(" ORDER BY ");
    if sort == SortMode::Popularity {
        builder.push(popularity_expr(popularity)).push(" DESC, ");
    }
    builder
        .push(NAME_ORDER)
        .push(" LIMIT ")
        .push_bind(i64::from(page.page_size()))
        .push(" OFFSET ")
        .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
    builder
}

/// Count terms passing `filter`, for pages past the last match.
pub(crate) fn count_query(filter: &TermFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM terms t WHERE TRUE");
    push_predicates(&mut builder, filter);
    builder
}

/// Lowercased text compared bytewise, then raw text, then id.
const NAME_ORDER: &str = r#"lower(t.term) COLLATE "C", t.term COLLATE "C", t.id"#;

fn popularity_expr(formula: PopularityFormula) -> &'static str {
    match formula {
        PopularityFormula::Upvotes => "COALESCE(v.upvotes, 0)",
        PopularityFormula::NetScore => "(COALESCE(v.upvotes, 0) - COALESCE(v.downvotes, 0))",
    }
}

fn push_predicates(builder: &mut QueryBuilder<'static, Postgres>, filter: &TermFilter) {
    if let TextMatch::Contains(ref query) = filter.text {
        builder
            .push(" AND t.term ILIKE ")
            .push_bind(format!("%{}%", escape_like(query)))
            .push(r" ESCAPE '\'");
    }
    if let Some(ref language) = filter.language {
        builder.push(" AND t.language = ").push_bind(language.clone());
    }
    if let Some(ref domain) = filter.domain {
        builder.push(" AND t.domain = ").push_bind(domain.clone());
    }
}

pub(crate) fn suggest_query(prefix: &str, limit: usize) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT id, term FROM terms WHERE term ILIKE ");
    builder
        .push_bind(format!("{}%", escape_like(prefix)))
        .push(r" ESCAPE '\'")
        .push(r#" ORDER BY lower(term) COLLATE "C", id LIMIT "#)
        .push_bind(limit as i64);
    builder
}

#[async_trait]
impl TermRepository for PgTermRepository {
    async fn candidates(&self, filter: &TermFilter) -> Result<Vec<TermHit>> {
        let rows = candidates_query(filter)
            .build_query_as::<TermHitRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TermHit::from).collect())
    }

    async fn ranked_page(
        &self,
        filter: &TermFilter,
        sort: SortMode,
        popularity: PopularityFormula,
        page: &PageRequest,
    ) -> Result<Page<TermHit>> {
        let rows = ranked_page_query(filter, sort, popularity, page)
            .build_query_as::<RankedRow>()
            .fetch_all(&self.pool)
            .await?;

        let total = match rows.first() {
            Some(row) => row.total,
            None if page.offset() == 0 => 0,
            None => {
                count_query(filter)
                    .build_query_scalar::<i64>()
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(Page {
            total: usize::try_from(total).unwrap_or_default(),
            items: rows.into_iter().map(|row| TermHit::from(row.hit)).collect(),
        })
    }

    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<Suggestion>> {
        let rows = suggest_query(prefix, limit)
            .build_query_as::<SuggestionRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Suggestion {
                id: TermId::new(row.id),
                label: row.term,
            })
            .collect())
    }

    async fn facets(&self) -> Result<Facets> {
        let languages = sqlx::query_as::<_, FacetRow>(
            r#"
            SELECT language AS value, COUNT(*) AS count
            FROM terms
            GROUP BY language
            ORDER BY language
            "#,
        )
        .fetch_all(&self.pool);

        let domains = sqlx::query_as::<_, FacetRow>(
            r#"
            SELECT domain AS value, COUNT(*) AS count
            FROM terms
            GROUP BY domain
            ORDER BY domain
            "#,
        )
        .fetch_all(&self.pool);

        let (languages, domains) = tokio::try_join!(languages, domains)?;

        Ok(Facets {
            languages: languages.into_iter().map(FacetCount::from).collect(),
            domains: domains.into_iter().map(FacetCount::from).collect(),
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Row types for sqlx queries

#[derive(sqlx::FromRow)]
struct TermHitRow {
    id: i32,
    term: String,
    language: String,
    domain: String,
    definition: String,
    owner_id: Option<i32>,
    upvotes: i64,
    downvotes: i64,
}

impl From<TermHitRow> for TermHit {
    fn from(row: TermHitRow) -> Self {
        TermHit {
            term: Term {
                id: TermId::new(row.id),
                term: row.term,
                language: row.language,
                domain: row.domain,
                definition: row.definition,
                owner_id: row.owner_id,
            },
            votes: VoteTally::new(row.upvotes, row.downvotes),
        }
    }
}

#[derive(sqlx::FromRow)]
struct RankedRow {
    #[sqlx(flatten)]
    hit: TermHitRow,
    total: i64,
}

#[derive(sqlx::FromRow)]
struct SuggestionRow {
    id: i32,
    term: String,
}

#[derive(sqlx::FromRow)]
struct FacetRow {
    value: String,
    count: i64,
}

impl From<FacetRow> for FacetCount {
    fn from(row: FacetRow) -> Self {
        FacetCount {
            value: row.value,
            count: row.count,
        }
    }
}
