use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use tower::util::ServiceExt;

use simi_db::Dictionary;
use simi_server::handlers::{AppState, router};

const QE: &str = r#"[
  {"lema": "Achupalla", "categoria_gramatical": "s.", "campo_semantico": ["Bot.", "Med.Folk."],
   "definicion": "Planta usada en la Medicina Folklorica tradicional.",
   "variantes_dialectales": {"Peru": {"Cusco": ["achupalla", "achupaya"]}}},
  {"lema": "atoq", "categoria_gramatical": "s.", "campo_semantico": "Zool.",
   "definicion": "Zorro andino.", "sinonimos": ["atuq"]},
  {"lema": "mikhuy", "categoria_gramatical": "v.", "definicion": "Comer."}
]"#;

const EQ: &str = r#"[
  {"lema": "zorro", "definicion": "atoq.", "variantes_dialectales": ["atoq", "atuq"]},
  {"lema": "comer", "definicion": "mikhuy."}
]"#;

fn make_state(disable_cache: bool) -> AppState {
    let tempdir = tempfile::tempdir().unwrap();
    let qe = tempdir.path().join("quechua_espanol.json");
    let eq = tempdir.path().join("espanol_quechua.json");
    std::fs::write(&qe, QE).unwrap();
    std::fs::write(&eq, EQ).unwrap();
    let dictionary = Dictionary::load(&qe, &eq);
    AppState {
        dictionary: Arc::new(dictionary),
        max_page_size: 500,
        disable_cache,
    }
}

async fn get(state: AppState, uri: &str) -> Response {
    router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

async fn get_json(state: AppState, uri: &str) -> serde_json::Value {
    json_body(get(state, uri).await).await
}

#[tokio::test]
async fn healthz_ok() {
    let response = get(make_state(false), "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn lookup_ignores_case_and_sets_cache_header() {
    let response = get(make_state(false), "/v1/lookup?lemma=ACHUPALLA").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::CACHE_CONTROL));
    let body = json_body(response).await;
    assert_eq!(body["direction"], "forward");
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["lema"], "Achupalla");
    assert_eq!(entries[0]["campo_semantico"][1], "Med.Folk.");
}

#[tokio::test]
async fn lookup_reverse_direction() {
    let body = get_json(make_state(false), "/v1/lookup?lemma=Zorro&direction=eq").await;
    assert_eq!(body["direction"], "reverse");
    assert_eq!(body["entries"][0]["definicion"], "atoq.");
}

#[tokio::test]
async fn lookup_missing_lemma_is_empty_not_an_error() {
    let response = get(make_state(false), "/v1/lookup?lemma=mayu").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn lookup_rejects_unknown_direction() {
    let response = get(make_state(false), "/v1/lookup?lemma=atoq&direction=sideways").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("direction")
    );
}

#[tokio::test]
async fn category_filter_paginates() {
    let response = get(make_state(false), "/v1/category?label=s.&page=1&page_size=1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["query"], "s.");
    assert_eq!(body["total"], 2);
    assert_eq!(body["has_more"], true);
    assert_eq!(body["items"][0]["lema"], "Achupalla");

    let body = get_json(make_state(false), "/v1/category?label=s.&page=2&page_size=1").await;
    assert_eq!(body["has_more"], false);
    assert_eq!(body["items"][0]["lema"], "atoq");
}

#[tokio::test]
async fn field_filter_matches_exact_label() {
    let body = get_json(make_state(false), "/v1/field?label=Zool.").await;
    assert_eq!(body["total"], 1);
    let body = get_json(make_state(false), "/v1/field?label=zool.").await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn label_listings_keep_first_seen_order() {
    let body = get_json(make_state(false), "/v1/categories").await;
    assert_eq!(body["labels"], serde_json::json!(["s.", "v."]));
    let body = get_json(make_state(false), "/v1/fields").await;
    assert_eq!(body["labels"], serde_json::json!(["Bot.", "Med.Folk.", "Zool."]));
}

#[tokio::test]
async fn search_spans_both_directions() {
    let body = get_json(make_state(false), "/v1/search?q=ATOQ").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["lema"], "zorro");

    let body = get_json(make_state(false), "/v1/search?q=folk").await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn search_rejects_blank_query() {
    let response = get(make_state(false), "/v1/search?q=%20").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("required")
    );
}

#[tokio::test]
async fn search_rejects_invalid_paging() {
    let response = get(make_state(false), "/v1/search?q=a&page=0&page_size=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .to_lowercase()
            .contains("page")
    );
}

#[tokio::test]
async fn page_size_is_clamped() {
    let mut state = make_state(false);
    state.max_page_size = 2;
    let body = get_json(state, "/v1/lemmas?page_size=100").await;
    assert_eq!(body["page_size"], 2);
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"], serde_json::json!(["achupalla", "atoq"]));
}

#[tokio::test]
async fn variants_flatten_both_directions() {
    let body = get_json(make_state(false), "/v1/variants?lemma=Achupalla").await;
    assert_eq!(
        body["variants"],
        serde_json::json!(["Peru/Cusco: achupalla, achupaya"])
    );
    let body = get_json(make_state(false), "/v1/variants?lemma=zorro").await;
    assert_eq!(body["variants"], serde_json::json!([": atoq, atuq"]));
}

#[tokio::test]
async fn counts_and_stats_report_totals() {
    let body = get_json(make_state(false), "/v1/counts").await;
    assert_eq!(body, serde_json::json!({"forward": 3, "reverse": 2, "total": 5}));

    let body = get_json(make_state(false), "/v1/stats").await;
    assert_eq!(body["counts"]["total"], 5);
    assert_eq!(body["category_count"], 2);
    assert_eq!(body["field_count"], 3);
    assert_eq!(body["variant_entries"], 4);
    assert_eq!(body["synonym_entries"], 1);
}

#[tokio::test]
async fn disabled_cache_omits_header() {
    let response = get(make_state(true), "/v1/counts").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key(header::CACHE_CONTROL));
}
