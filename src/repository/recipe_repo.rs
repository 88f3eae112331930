// ==========================================
// Resto Supply - recipe and menu-schedule repositories
// ==========================================
// Responsibility: recipe/recipe_ingredient and menu_schedule/schedule_item
// CRUD feeding the shortfall calculator.
// ==========================================

use crate::domain::recipe::{MenuSchedule, Recipe, RecipeIngredient, ScheduleItem};
use crate::repository::db_utils::{date_from_db, date_to_db, ts_from_db, ts_to_db};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// RecipeRepository
// ==========================================

pub struct RecipeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RecipeRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_recipe(row: &Row) -> SqliteResult<Recipe> {
        Ok(Recipe {
            recipe_id: row.get(0)?,
            name: row.get(1)?,
            portions: row.get(2)?,
            active: row.get::<_, i64>(3)? != 0,
            created_at: ts_from_db(&row.get::<_, String>(4)?),
        })
    }

    /// Insert or replace a recipe together with its ingredient lines.
    pub fn upsert_with_ingredients(
        &self,
        recipe: &Recipe,
        ingredients: &[RecipeIngredient],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            r#"
            INSERT OR REPLACE INTO recipe (recipe_id, name, portions, active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                recipe.recipe_id,
                recipe.name,
                recipe.portions,
                recipe.active as i64,
                ts_to_db(recipe.created_at),
            ],
        )?;

        tx.execute(
            "DELETE FROM recipe_ingredient WHERE recipe_id = ?1",
            params![recipe.recipe_id],
        )?;
        for ing in ingredients {
            tx.execute(
                r#"
                INSERT INTO recipe_ingredient (recipe_id, item_code, quantity, unit)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![ing.recipe_id, ing.item_code, ing.quantity, ing.unit],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    pub fn find_by_id(&self, recipe_id: &str) -> RepositoryResult<Option<Recipe>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT recipe_id, name, portions, active, created_at FROM recipe WHERE recipe_id = ?1",
        )?;
        let recipe = stmt
            .query_row(params![recipe_id], Self::map_recipe)
            .optional()?;
        Ok(recipe)
    }

    /// Ingredient lines of one recipe.
    pub fn list_ingredients(&self, recipe_id: &str) -> RepositoryResult<Vec<RecipeIngredient>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT recipe_id, item_code, quantity, unit
            FROM recipe_ingredient
            WHERE recipe_id = ?1
            ORDER BY item_code
            "#,
        )?;
        let ingredients = stmt
            .query_map(params![recipe_id], |row| {
                Ok(RecipeIngredient {
                    recipe_id: row.get(0)?,
                    item_code: row.get(1)?,
                    quantity: row.get(2)?,
                    unit: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<RecipeIngredient>>>()?;
        Ok(ingredients)
    }
}

// ==========================================
// MenuScheduleRepository
// ==========================================

pub struct MenuScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MenuScheduleRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert or replace a schedule together with its recipe references.
    pub fn upsert_with_items(
        &self,
        schedule: &MenuSchedule,
        items: &[ScheduleItem],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            r#"
            INSERT OR REPLACE INTO menu_schedule (
                schedule_id, name, location, start_date, end_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                schedule.schedule_id,
                schedule.name,
                schedule.location,
                date_to_db(schedule.start_date),
                date_to_db(schedule.end_date),
                ts_to_db(schedule.created_at),
            ],
        )?;

        tx.execute(
            "DELETE FROM schedule_item WHERE schedule_id = ?1",
            params![schedule.schedule_id],
        )?;
        for item in items {
            tx.execute(
                r#"
                INSERT INTO schedule_item (schedule_id, recipe_id, target_portions)
                VALUES (?1, ?2, ?3)
                "#,
                params![item.schedule_id, item.recipe_id, item.target_portions],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    pub fn find_by_id(&self, schedule_id: &str) -> RepositoryResult<Option<MenuSchedule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT schedule_id, name, location, start_date, end_date, created_at
            FROM menu_schedule
            WHERE schedule_id = ?1
            "#,
        )?;
        let schedule = stmt
            .query_row(params![schedule_id], |row| {
                Ok(MenuSchedule {
                    schedule_id: row.get(0)?,
                    name: row.get(1)?,
                    location: row.get(2)?,
                    start_date: date_from_db(&row.get::<_, String>(3)?),
                    end_date: date_from_db(&row.get::<_, String>(4)?),
                    created_at: ts_from_db(&row.get::<_, String>(5)?),
                })
            })
            .optional()?;
        Ok(schedule)
    }

    /// Recipe references of one schedule.
    pub fn list_items(&self, schedule_id: &str) -> RepositoryResult<Vec<ScheduleItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT schedule_id, recipe_id, target_portions
            FROM schedule_item
            WHERE schedule_id = ?1
            ORDER BY recipe_id
            "#,
        )?;
        let items = stmt
            .query_map(params![schedule_id], |row| {
                Ok(ScheduleItem {
                    schedule_id: row.get(0)?,
                    recipe_id: row.get(1)?,
                    target_portions: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<ScheduleItem>>>()?;
        Ok(items)
    }
}
