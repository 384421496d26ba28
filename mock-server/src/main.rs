use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("mock task-manager API listening on {}", listener.local_addr().unwrap());
    mock_server::run(listener).await.unwrap();
}
