use bookstock_contract::BookType;
use bookstock_dal::book::BookRepositoryImpl;
use bookstock_dal::{CreateBook, Error, ListingParams, Order, Projection, SaleOutcome, NO_IMAGE_URI};
use tracing_test::traced_test;

const TEST_DATA: &str = r#"
INSERT INTO books (_id, title, author, type, price, quantity, supplier, telephone_supplier, email_supplier, image)
VALUES (1, '1984', 'George Orwell', 1, 22, 14, 'New American Library', '+30 2310 000000', 'american_library@books.com', 'resource://bookstock/drawable/book5470');
INSERT INTO books (_id, title, author, type, price, quantity, supplier, telephone_supplier, email_supplier, image)
VALUES (2, 'Pride and Prejudice', 'Jane Austen', 1, 25, 4, 'Modern Library', '+30 210 0000000', 'modern_library@books.com', 'resource://bookstock/drawable/book1885');
INSERT INTO books (_id, title, author, type, price, quantity, supplier, telephone_supplier, email_supplier, image)
VALUES (3, 'Romeo and Juliet', 'William Shakespeare', 1, 33, 8, 'Washington Square Press', '+30 2430 000000', 'square_press@books.com', 'resource://bookstock/drawable/book18135');
INSERT INTO books (_id, title, author, type, price, quantity, supplier, telephone_supplier, email_supplier, image)
VALUES (4, 'Programming Android', NULL, 2, 36, 50, NULL, '+30 2230 000000', 'android_books@books.com', 'resource://bookstock/drawable/book6672');
"#;

async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    sqlx::migrate!("../../migrations").run(&conn).await.unwrap();

    sqlx::raw_sql(TEST_DATA).execute(&conn).await.unwrap();

    conn
}

fn new_book() -> CreateBook {
    CreateBook {
        title: "Charlotte's Web".to_string(),
        author: Some("E.B. White".to_string()),
        book_type: BookType::Novel,
        price: 16,
        quantity: Some(34),
        supplier: Some("Harper Collins Publishers".to_string()),
        supplier_phone: None,
        supplier_email: Some("harpercollins@books.com".to_string()),
        image: Some("resource://bookstock/drawable/book24178".to_string()),
    }
}

#[tokio::test]
async fn test_book_create_round_trip() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    let created = repo.create(new_book()).await.unwrap();
    assert!(created.id > 4);
    assert_eq!(created.title, "Charlotte's Web");
    assert_eq!(created.author.as_deref(), Some("E.B. White"));
    assert_eq!(created.book_type, BookType::Novel);
    assert_eq!(created.price, Some(16));
    assert_eq!(created.quantity, 34);

    // Everything written reads back unchanged by id
    let fetched = repo.get(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    let mut payload = new_book();
    payload.quantity = None;
    payload.image = None;
    let created = repo.create(payload).await.unwrap();
    assert_eq!(created.quantity, 0);
    assert_eq!(created.image.as_deref(), Some(NO_IMAGE_URI));
}

#[tokio::test]
async fn test_ids_are_not_reused() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    let first = repo.create(new_book()).await.unwrap();
    assert_eq!(repo.delete(first.id).await.unwrap(), 1);
    let second = repo.create(new_book()).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_book_update() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    let mut payload = new_book();
    payload.title = "Charlotte's Web (2nd ed.)".to_string();
    payload.price = 18;
    let updated = repo.update(2, payload).await.unwrap();
    assert_eq!(updated.id, 2);
    assert_eq!(updated.title, "Charlotte's Web (2nd ed.)");
    assert_eq!(updated.price, Some(18));

    // Unknown id maps to a not-found failure, not a silent no-op
    assert!(matches!(
        repo.update(999, new_book()).await,
        Err(Error::RecordNotFound(999))
    ));
}

#[tokio::test]
async fn test_update_quantity_observed_by_get() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    for quantity in [0, 7, 131] {
        let updated = repo.update_quantity(3, quantity).await.unwrap();
        assert_eq!(updated.quantity, quantity);
        assert_eq!(repo.get(3).await.unwrap().quantity, quantity);
    }
}

#[tokio::test]
#[traced_test]
async fn test_sell_one() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    repo.update_quantity(2, 3).await.unwrap();
    assert_eq!(
        repo.sell_one(2).await.unwrap(),
        SaleOutcome::Sold { remaining: 2 }
    );
    assert_eq!(repo.get(2).await.unwrap().quantity, 2);

    repo.update_quantity(2, 0).await.unwrap();
    assert_eq!(repo.sell_one(2).await.unwrap(), SaleOutcome::OutOfStock);
    assert_eq!(repo.get(2).await.unwrap().quantity, 0);
    assert!(logs_contain("out of stock"));

    assert!(matches!(
        repo.sell_one(999).await,
        Err(Error::RecordNotFound(999))
    ));
}

#[tokio::test]
async fn test_list() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    let all = repo.list(ListingParams::default()).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(repo.count().await.unwrap(), 4);

    let by_title = repo
        .list(ListingParams::default().with_order(vec![Order::Asc("title".to_string())]))
        .await
        .unwrap();
    assert_eq!(by_title[0].title, "1984");
    assert_eq!(by_title[3].title, "Romeo and Juliet");

    let page = repo
        .list(ListingParams::new(1, 2).with_order(vec![Order::Asc("title".to_string())]))
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].title, "Pride and Prejudice");

    assert!(matches!(
        repo.list(ListingParams::default().with_order(vec![Order::Asc("supplier; --".to_string())]))
            .await,
        Err(Error::InvalidOrderByField(_))
    ));
}

#[tokio::test]
async fn test_projected_queries() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    let projection = Projection::new(["title", "quantity"]).unwrap();
    let rows = repo
        .list_projected(&projection, ListingParams::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(row.len(), 2);
        assert!(row.contains_key("title"));
        assert!(row.contains_key("quantity"));
    }

    let row = repo.get_projected(1, &projection).await.unwrap().unwrap();
    assert_eq!(row["title"], serde_json::json!("1984"));
    assert_eq!(row["quantity"], serde_json::json!(14));

    // NULL column comes back as JSON null
    let projection = Projection::new(["author"]).unwrap();
    let row = repo.get_projected(4, &projection).await.unwrap().unwrap();
    assert_eq!(row["author"], serde_json::Value::Null);

    assert!(repo.get_projected(999, &projection).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    assert_eq!(repo.delete(1).await.unwrap(), 1);
    assert!(matches!(repo.get(1).await, Err(Error::RecordNotFound(1))));
    // Second delete is a zero-count result, not an error
    assert_eq!(repo.delete(1).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_all() {
    let conn = init_db().await;
    let repo = BookRepositoryImpl::new(conn);

    let before = repo.count().await.unwrap();
    assert_eq!(repo.delete_all().await.unwrap(), before);
    assert!(repo.list(ListingParams::default()).await.unwrap().is_empty());
    assert_eq!(repo.delete_all().await.unwrap(), 0);
}
