//! Full CRUD lifecycle test against a live todo server.
//!
//! # Design
//! Starts the server on a random port over an in-memory SQLite database, then
//! exercises every client operation over real HTTP using ureq. Validates that
//! request building and response parsing agree with the actual server.

use todo_core::{ApiError, HttpMethod, HttpResponse, TodoClient, TodoContent};
use todo_server::db::{self, DatabaseUrl};
use todo_server::AppState;

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: todo_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Bind a random port and serve from a background thread with its own runtime.
fn spawn_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let url = DatabaseUrl::parse("sqlite::memory:").unwrap();
            let pool = db::connect(&url, 1).await.unwrap();
            db::create_schema(&pool, url.driver()).await.unwrap();

            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, AppState::new(pool), std::future::pending()).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn crud_lifecycle() {
    // Step 1: start the server on a random port.
    let addr = spawn_server();
    let client = TodoClient::new(&format!("http://{addr}"));

    // Step 2: root answers.
    let req = client.build_read_root();
    let greeting = client.parse_read_root(execute(req)).unwrap();
    assert_eq!(greeting.hello, "World");

    // Step 3: list is empty.
    let req = client.build_list_todos();
    let todos = client.parse_list_todos(execute(req)).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 4: create a todo.
    let req = client.build_create_todo(&TodoContent::new("buy milk")).unwrap();
    let created = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(created.content, "buy milk");
    let id = created.id;

    // Step 5: list contains exactly the created todo.
    let req = client.build_list_todos();
    let todos = client.parse_list_todos(execute(req)).unwrap();
    assert_eq!(todos, vec![created.clone()]);

    // Step 6: update content in place.
    let req = client.build_update_todo(id, &TodoContent::new("buy oat milk")).unwrap();
    let updated = client.parse_update_todo(execute(req)).unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.content, "buy oat milk");

    // Step 7: list still has one row, now updated.
    let req = client.build_list_todos();
    let todos = client.parse_list_todos(execute(req)).unwrap();
    assert_eq!(todos, vec![updated]);

    // Step 8: delete.
    let req = client.build_delete_todo(id);
    client.parse_delete_todo(execute(req)).unwrap();

    // Step 9: update after delete is NotFound with the server's detail.
    let req = client.build_update_todo(id, &TodoContent::new("gone")).unwrap();
    let err = client.parse_update_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { ref detail } if detail == "Task not found"));

    // Step 10: delete again is NotFound.
    let req = client.build_delete_todo(id);
    let err = client.parse_delete_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));

    // Step 11: list is empty again.
    let req = client.build_list_todos();
    let todos = client.parse_list_todos(execute(req)).unwrap();
    assert!(todos.is_empty(), "expected empty list after delete");
}
