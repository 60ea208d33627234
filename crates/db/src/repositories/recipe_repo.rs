//! Repository for the `recipes` table.

use recipebox_core::ordering::RecipeOrder;
use recipebox_core::recipe::{escape_like, NewRecipe, RecipeChanges, RecipeQuery};
use recipebox_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe::RecipeRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "r.id, r.owner_id, r.title, r.ingredients, r.preparation, r.about, \
    r.photo_url, r.created_at, r.updated_at";

/// Same columns, unqualified, for `RETURNING` clauses.
const RETURNING: &str =
    "id, owner_id, title, ingredients, preparation, about, photo_url, created_at, updated_at";

/// Live mean score of a recipe's ratings; unrated recipes score 0.
const MEAN_SCORE: &str =
    "COALESCE((SELECT AVG(ra.score)::float8 FROM ratings ra WHERE ra.recipe_id = r.id), 0)";

/// `ORDER BY` body for a listing policy. Every policy ends in a unique key
/// so page boundaries are stable.
pub fn order_clause(order: RecipeOrder) -> String {
    match order {
        RecipeOrder::Recent => "r.created_at DESC, r.id DESC".to_string(),
        RecipeOrder::Oldest => "r.created_at ASC, r.id ASC".to_string(),
        RecipeOrder::Rating => format!("{MEAN_SCORE} DESC, r.created_at DESC, r.id DESC"),
    }
}

/// Build the listing SQL. Placeholders are numbered in bind order:
/// author, search pattern, limit, offset (absent parts are skipped).
pub fn listing_sql(query: &RecipeQuery) -> String {
    let mut conditions = Vec::new();
    let mut param = 0;
    let mut next = || {
        param += 1;
        param
    };

    if query.author_id.is_some() {
        conditions.push(format!("r.owner_id = ${}", next()));
    }
    if query.search.is_some() {
        conditions.push(format!(
            "(r.title || ' ' || r.ingredients) ILIKE '%' || ${} || '%' ESCAPE '\\'",
            next()
        ));
    }

    let mut sql = format!("SELECT {COLUMNS} FROM recipes r");
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY ");
    sql.push_str(&order_clause(query.order));
    if query.page.is_some() {
        let limit = next();
        let offset = next();
        sql.push_str(&format!(" LIMIT ${limit} OFFSET ${offset}"));
    }
    sql
}

/// Provides CRUD and listing operations for recipes.
pub struct RecipeRepo;

impl RecipeRepo {
    /// Insert a new recipe, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &NewRecipe,
    ) -> Result<RecipeRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO recipes (owner_id, title, ingredients, preparation, about, photo_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {RETURNING}"
        );
        sqlx::query_as::<_, RecipeRow>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.ingredients)
            .bind(&input.preparation)
            .bind(&input.about)
            .bind(&input.photo_url)
            .fetch_one(pool)
            .await
    }

    /// Find a recipe by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RecipeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes r WHERE r.id = $1");
        sqlx::query_as::<_, RecipeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Run a listing. When paginated, fetches one row past the page so the
    /// caller can tell whether another page exists.
    pub async fn list(pool: &PgPool, query: &RecipeQuery) -> Result<Vec<RecipeRow>, sqlx::Error> {
        let sql = listing_sql(query);
        let mut q = sqlx::query_as::<_, RecipeRow>(&sql);
        if let Some(author_id) = query.author_id {
            q = q.bind(author_id);
        }
        if let Some(term) = &query.search {
            q = q.bind(escape_like(term));
        }
        if let Some(page) = query.page {
            q = q.bind(page.fetch_limit()).bind(page.offset());
        }
        q.fetch_all(pool).await
    }

    /// Update a recipe. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &RecipeChanges,
    ) -> Result<Option<RecipeRow>, sqlx::Error> {
        let query = format!(
            "UPDATE recipes SET
                title = COALESCE($2, title),
                ingredients = COALESCE($3, ingredients),
                preparation = COALESCE($4, preparation),
                about = COALESCE($5, about),
                photo_url = COALESCE($6, photo_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {RETURNING}"
        );
        sqlx::query_as::<_, RecipeRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.ingredients)
            .bind(&input.preparation)
            .bind(&input.about)
            .bind(&input.photo_url)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a recipe by ID. Returns `true` if a row was removed.
    /// Its ratings go with it (`ON DELETE CASCADE`).
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
