use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Unchanged};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ActiveModelTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::{
    db::OrmConn,
    dto::products::ProductPayload,
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::AppResult,
    models::Product,
};

use super::ProductRepository;

#[derive(Clone)]
pub struct SeaOrmProductRepository {
    orm: OrmConn,
}

impl SeaOrmProductRepository {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn find_all(&self) -> AppResult<Vec<Product>> {
        let items = Products::find()
            .order_by_asc(Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let result = Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity);
        Ok(result)
    }

    async fn insert(&self, payload: ProductPayload) -> AppResult<Product> {
        let active = ActiveModel {
            id: NotSet,
            name: Set(payload.name),
            description: Set(payload.description),
            price: Set(payload.price),
            category: Set(payload.category),
        };
        let product = active.insert(&self.orm).await?;
        Ok(product_from_entity(product))
    }

    async fn save(&self, product: Product) -> AppResult<Product> {
        let active = ActiveModel {
            id: Unchanged(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            category: Set(product.category),
        };
        let product = active.update(&self.orm).await?;
        Ok(product_from_entity(product))
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<u64> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected)
    }

    async fn find_by_category_ignore_case(&self, category: &str) -> AppResult<Vec<Product>> {
        let items = Products::find()
            .filter(Expr::expr(Func::lower(Expr::col(Column::Category))).eq(category.to_lowercase()))
            .order_by_asc(Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }

    async fn search_by_name_or_category(&self, query: &str) -> AppResult<Vec<Product>> {
        let pattern = contains_pattern(query);
        let condition = Condition::any()
            .add(Expr::col(Column::Name).ilike(LikeExpr::new(pattern.clone()).escape('\\')))
            .add(Expr::col(Column::Category).ilike(LikeExpr::new(pattern).escape('\\')));
        let items = Products::find()
            .filter(condition)
            .order_by_asc(Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }
}

/// `%query%` with the query's own `%`, `_` and `\` escaped so they match literally.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category: model.category,
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn wraps_plain_queries_in_wildcards() {
        assert_eq!(contains_pattern("prod"), "%prod%");
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(contains_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
