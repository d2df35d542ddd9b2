// tests/api_smoke.rs
// Full request/response cycle against the router, no listening socket.
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use transaksi_api::assets::AssetStore;
use transaksi_api::store::{create_store, StoreMode};

const BOUNDARY: &str = "transaksi-test-boundary";

fn test_router(tmp: &TempDir) -> Router {
    let assets = AssetStore::new(tmp.path().join("uploads")).expect("asset dir");
    let store = create_store(
        StoreMode::JsonFile,
        tmp.path().join("public").join("transaksi.json"),
        assets.clone(),
    );
    transaksi_api::api::router(store, assets, &tmp.path().join("public"))
}

fn text_part(name: &str, value: &str) -> Vec<u8> {
    format!(
        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}",
        name, value
    )
    .into_bytes()
}

fn file_part(name: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut part = format!(
        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
        name, filename
    )
    .into_bytes();
    part.extend_from_slice(bytes);
    part
}

fn multipart_body(parts: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(part);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn submit_request(parts: &[Vec<u8>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/transaksi")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("request")
}

fn budi_parts(with_file: bool) -> Vec<Vec<u8>> {
    let mut parts = vec![
        text_part("nama", "Budi"),
        text_part("telepon", "081234567890"),
        text_part("alamat", "Jl. A"),
        text_part("metode", "transfer"),
        text_part("total", "50000"),
    ];
    if with_file {
        parts.push(file_part("bukti", "proof.png", &[1, 2, 3]));
    }
    parts
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = router.clone().oneshot(req).await.expect("response");
    let status = res.status();
    let bytes = hyper::body::to_bytes(res.into_body()).await.expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn submit_list_delete_flow() {
    let tmp = TempDir::new().expect("tempdir");
    let router = test_router(&tmp);

    // submit
    let (status, body) = send(&router, submit_request(&budi_parts(true))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaksi berhasil disimpan");
    let data = &body["data"];
    assert_eq!(data["nama"], "Budi");
    assert_eq!(data["total"], "50000");

    let bukti = data["bukti"].as_str().expect("bukti");
    let stem = bukti
        .strip_prefix("/uploads/")
        .and_then(|f| f.strip_suffix(".png"))
        .expect("bukti shaped like /uploads/<digits>.png");
    assert!(stem.chars().all(|c| c.is_ascii_digit()));

    // the stored asset is served back under /uploads
    let res = router
        .clone()
        .oneshot(get(bukti))
        .await
        .expect("asset response");
    assert_eq!(res.status(), StatusCode::OK);
    let served = hyper::body::to_bytes(res.into_body()).await.expect("bytes");
    assert_eq!(&served[..], &[1u8, 2, 3][..]);

    // list
    let (status, body) = send(&router, get("/transaksi")).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    let id = listed[0]["id"].as_str().expect("id").to_string();

    // delete
    let (status, body) = send(&router, delete(&format!("/transaksi/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaksi berhasil dihapus");

    let (status, body) = send(&router, get("/transaksi")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 0);

    // asset gone too
    let res = router.clone().oneshot(get(bukti)).await.expect("response");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_without_proof_is_rejected() {
    let tmp = TempDir::new().expect("tempdir");
    let router = test_router(&tmp);

    let (status, body) = send(&router, submit_request(&budi_parts(false))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bukti transfer tidak ditemukan");

    // nothing was stored
    let (status, body) = send(&router, get("/transaksi")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().expect("array").is_empty());
}

#[tokio::test]
async fn text_part_named_bukti_is_not_a_proof() {
    let tmp = TempDir::new().expect("tempdir");
    let router = test_router(&tmp);

    // a plain text field named bukti carries no filename and must not be
    // mistaken for the proof upload
    let mut parts = budi_parts(false);
    parts.push(text_part("bukti", "bukan-file"));

    let (status, body) = send(&router, submit_request(&parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bukti transfer tidak ditemukan");
}

#[tokio::test]
async fn corrupt_document_on_list_is_a_neutral_500() {
    let tmp = TempDir::new().expect("tempdir");
    let router = test_router(&tmp);

    let doc = tmp.path().join("public").join("transaksi.json");
    std::fs::create_dir_all(doc.parent().expect("parent")).expect("dir");
    std::fs::write(&doc, "{ bukan json").expect("write");

    let (status, body) = send(&router, get("/transaksi")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // a read failure must not claim a save failed
    assert_eq!(body["error"], "Terjadi kesalahan pada server");
}

#[tokio::test]
async fn list_is_empty_array_before_first_submit() {
    let tmp = TempDir::new().expect("tempdir");
    let router = test_router(&tmp);

    let (status, body) = send(&router, get("/transaksi")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn delete_before_any_submit_is_not_found() {
    let tmp = TempDir::new().expect("tempdir");
    let router = test_router(&tmp);

    let (status, body) = send(&router, delete("/transaksi/some-id")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Data tidak ditemukan");
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let tmp = TempDir::new().expect("tempdir");
    let router = test_router(&tmp);

    let (status, _) = send(&router, submit_request(&budi_parts(true))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, delete("/transaksi/some-other-id")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Transaksi tidak ditemukan");

    // the existing record is untouched
    let (_, body) = send(&router, get("/transaksi")).await;
    assert_eq!(body.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn health_reports_ok() {
    let tmp = TempDir::new().expect("tempdir");
    let router = test_router(&tmp);

    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
