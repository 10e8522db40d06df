use async_trait::async_trait;
use common::{AddressId, OrderId, ProductId, UserId};
use domain::{
    Address, Money, Order, OrderItem, OrderNumber, OrderStatus, PaymentMethod, PaymentStatus,
    Product, Role, User,
};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Result, StoreError,
    store::{NewAddress, NewProduct, NewUser, OrderStream, Store},
};

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_user(row: PgRow) -> Result<User> {
        let role: String = row.try_get("role")?;
        Ok(User {
            id: UserId::from_uuid(row.try_get::<Uuid, _>("id")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            role: role.parse::<Role>()?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_address(row: PgRow) -> Result<Address> {
        Ok(Address {
            id: AddressId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            line1: row.try_get("line1")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            pincode: row.try_get("pincode")?,
            country: row.try_get("country")?,
        })
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            price: Money::from_paise(row.try_get("price_paise")?),
            stock: row.try_get::<i32, _>("stock")? as u32,
            active: row.try_get("active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_order(row: PgRow, items: Vec<OrderItem>) -> Result<Order> {
        let status: String = row.try_get("status")?;
        let payment_status: String = row.try_get("payment_status")?;
        let payment_method: String = row.try_get("payment_method")?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_number: OrderNumber::from_string(row.try_get::<String, _>("order_number")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            shipping_address_id: row
                .try_get::<Option<Uuid>, _>("shipping_address_id")?
                .map(AddressId::from_uuid),
            subtotal: Money::from_paise(row.try_get("subtotal_paise")?),
            tax: Money::from_paise(row.try_get("tax_paise")?),
            shipping_cost: Money::from_paise(row.try_get("shipping_cost_paise")?),
            total: Money::from_paise(row.try_get("total_paise")?),
            status: status.parse::<OrderStatus>()?,
            payment_status: payment_status.parse::<PaymentStatus>()?,
            payment_method: payment_method.parse::<PaymentMethod>()?,
            payment_id: row.try_get("payment_id")?,
            items,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_order_item(row: &PgRow) -> Result<OrderItem> {
        Ok(OrderItem {
            product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
            quantity: row.try_get::<i32, _>("quantity")? as u32,
            unit_price: Money::from_paise(row.try_get("unit_price_paise")?),
        })
    }

    async fn load_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, quantity, unit_price_paise
            FROM order_items
            WHERE order_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_order_item).collect()
    }
}

/// Maps a unique-constraint violation onto `StoreError::Duplicate`.
fn map_unique_violation(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Duplicate {
            constraint: db_err.constraint().unwrap_or("unknown").to_string(),
        };
    }
    StoreError::Database(e)
}

#[async_trait]
impl Store for PostgresStore {
    async fn create_user(&self, new: NewUser) -> Result<User> {
        let id = UserId::new();
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, email, name, phone, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, name, phone, role, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.phone)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Self::row_to_user(row)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, name, phone, role, created_at FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, name, phone, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn create_address(&self, new: NewAddress) -> Result<Address> {
        let id = AddressId::new();
        let row = sqlx::query(
            r#"
            INSERT INTO addresses (id, user_id, full_name, phone, line1, city, state, pincode, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, full_name, phone, line1, city, state, pincode, country
            "#,
        )
        .bind(id.as_uuid())
        .bind(new.user_id.as_uuid())
        .bind(&new.full_name)
        .bind(&new.phone)
        .bind(&new.line1)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.pincode)
        .bind(&new.country)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_address(row)
    }

    async fn find_address(&self, id: AddressId) -> Result<Option<Address>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, full_name, phone, line1, city, state, pincode, country
            FROM addresses WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_address).transpose()
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product> {
        let id = ProductId::new();
        let row = sqlx::query(
            r#"
            INSERT INTO products (id, name, slug, price_paise, stock, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, slug, price_paise, stock, active, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&new.name)
        .bind(&new.slug)
        .bind(new.price.paise())
        .bind(new.stock as i32)
        .bind(new.active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Self::row_to_product(row)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(
            "SELECT id, name, slug, price_paise, stock, active, created_at FROM products WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn find_product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        let row = sqlx::query(
            "SELECT id, name, slug, price_paise, stock, active, created_at FROM products WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT id, name, slug, price_paise, stock, active, created_at FROM products ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn update_product(&self, product: Product) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, slug = $3, price_paise = $4, stock = $5, active = $6
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.slug)
        .bind(product.price.paise())
        .bind(product.stock as i32)
        .bind(product.active)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "product",
                id: product.id.to_string(),
            });
        }
        Ok(())
    }

    async fn insert_order(&self, order: Order) -> Result<()> {
        // Order row and item rows commit together; a failure at any point
        // leaves no partial order behind.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, user_id, shipping_address_id,
                subtotal_paise, tax_paise, shipping_cost_paise, total_paise,
                status, payment_status, payment_method, payment_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.order_number.as_str())
        .bind(order.user_id.as_uuid())
        .bind(order.shipping_address_id.map(|id| id.as_uuid()))
        .bind(order.subtotal.paise())
        .bind(order.tax.paise())
        .bind(order.shipping_cost.paise())
        .bind(order.total.paise())
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(order.payment_method.as_str())
        .bind(&order.payment_id)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, position, product_id, quantity, unit_price_paise)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id.as_uuid())
            .bind(position as i32)
            .bind(item.product_id.as_uuid())
            .bind(item.quantity as i32)
            .bind(item.unit_price.paise())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        metrics::counter!("store_orders_inserted_total").increment(1);
        tracing::debug!(order_id = %order.id, items = order.items.len(), "order persisted");
        Ok(())
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let items = self.load_items(id.as_uuid()).await?;
                Ok(Some(Self::row_to_order(row, items)?))
            }
            None => Ok(None),
        }
    }

    async fn find_order_by_number(&self, order_number: &str) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT * FROM orders WHERE order_number = $1")
            .bind(order_number)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let order_id: Uuid = row.try_get("id")?;
                let items = self.load_items(order_id).await?;
                Ok(Some(Self::row_to_order(row, items)?))
            }
            None => Ok(None),
        }
    }

    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let order_id: Uuid = row.try_get("id")?;
            let items = self.load_items(order_id).await?;
            orders.push(Self::row_to_order(row, items)?);
        }
        Ok(orders)
    }

    async fn stream_orders(&self) -> Result<OrderStream> {
        use futures_util::stream;

        // Orders are buffered and emitted as a stream; item loading per row
        // keeps the query simple at back-office volumes.
        let rows = sqlx::query("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let order_id: Uuid = row.try_get("id")?;
            let items = self.load_items(order_id).await?;
            orders.push(Self::row_to_order(row, items));
        }

        Ok(Box::pin(stream::iter(orders)))
    }

    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<()> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "order",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn mark_order_paid(&self, id: OrderId, payment_id: &str) -> Result<bool> {
        // Conditional update: the WHERE clause is the idempotence guard, so
        // two concurrent verifications cannot both apply the transition.
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'CONFIRMED', payment_status = 'PAID', payment_id = $2
            WHERE id = $1 AND payment_status = 'PENDING'
            "#,
        )
        .bind(id.as_uuid())
        .bind(payment_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            tracing::debug!(order_id = %id, "paid transition applied");
            return Ok(true);
        }

        // Distinguish "already paid" from "no such order".
        let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match exists {
            Some(_) => Ok(false),
            None => Err(StoreError::NotFound {
                entity: "order",
                id: id.to_string(),
            }),
        }
    }
}
