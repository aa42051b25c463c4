use crate::chart::{figure_json, ChartBuilder};
use crate::utils::*;
use crate::DEFAULT_RADIO_VALUE;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

const FLATLY_CSS: &str = "https://cdn.jsdelivr.net/npm/bootswatch@4.5.2/dist/flatly/bootstrap.min.css";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

// Ask for the figure on load and on every radio change,
// draw it only when the server sends one back.
const PAGE_SCRIPT: &str = r#"
const radio = document.getElementById("radio");
function selection() {
  const checked = radio.querySelector("input:checked");
  return checked ? checked.value : radio.dataset.value;
}
async function refresh() {
  const resp = await fetch("/_update", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ radio: selection() }),
  });
  const body = await resp.json();
  if (!resp.ok) {
    console.error(body.error);
    return;
  }
  if (body.figure) {
    Plotly.react("graph", body.figure.data, body.figure.layout, body.figure.config);
  }
}
radio.addEventListener("change", refresh);
refresh();
"#;

/// Text and images of the dashboard page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub title: String,
    pub leads: Vec<String>,
    pub background: String,
    pub cards: Vec<(String, u8)>,
    pub radio_value: String,
    pub radio_options: Vec<String>,
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            title: "Farm Pond Levels".to_owned(),
            leads: vec![
                "Hover mouse on line to see values.".to_owned(),
                "Click tabs to change dates shown.".to_owned(),
                "Double click anywhere in the graph to reset zoom.".to_owned(),
            ],
            background: "/assets/Background.png".to_owned(),
            cards: vec![
                ("/assets/sensor.png".to_owned(), 4),
                ("/assets/diagram.png".to_owned(), 5),
            ],
            radio_value: DEFAULT_RADIO_VALUE.to_owned(),
            radio_options: Vec::new(),
        }
    }
}

/// Render the page: header image and title block, the graph, the radio control,
/// and a row of image cards.
pub fn render_layout(layout: &PageLayout) -> String {
    let leads: String = layout
        .leads
        .iter()
        .map(|l| format!("<p class=\"lead\">{}</p>", html_escape(l)))
        .collect();
    let options: String = layout
        .radio_options
        .iter()
        .map(|o| {
            let checked = if *o == layout.radio_value { " checked" } else { "" };
            format!(
                concat!(
                    "<label class=\"mr-2\">",
                    "<input type=\"radio\" name=\"radio\" value=\"{0}\"{1}> {0}</label>"
                ),
                html_escape(o),
                checked
            )
        })
        .collect();
    let cards: String = layout
        .cards
        .iter()
        .map(|(src, width)| {
            format!(
                concat!(
                    "<div class=\"col-{}\"><div class=\"card\">",
                    "<img class=\"card-img-top\" src=\"{}\"></div></div>"
                ),
                width,
                html_escape(src)
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="{css}">
<script src="{plotly}"></script>
</head>
<body>
<div style="text-align:center">
<div class="container-fluid">
<img src="{background}" style="width:60%">
<div class="jumbotron jumbotron-fluid">
<h1 class="display-3">{title}</h1>
{leads}
</div>
</div>
<div id="graph"></div>
<div id="radio" data-value="{radio_value}">{options}</div>
<div class="row"><div class="col-1"></div>{cards}</div>
</div>
<script>{script}</script>
</body>
</html>
"#,
        title = html_escape(&layout.title),
        css = FLATLY_CSS,
        plotly = PLOTLY_JS,
        background = html_escape(&layout.background),
        leads = leads,
        radio_value = html_escape(&layout.radio_value),
        options = options,
        cards = cards,
        script = PAGE_SCRIPT,
    )
}

#[derive(Clone)]
struct AppState {
    builder: Arc<ChartBuilder>,
    page: Arc<str>,
}

/// Body of the update callback.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub radio: String,
}

/// The figure for the graph, none when the chart only goes to the html file.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub figure: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Routes of the dashboard: the page, the update callback, and the static assets.
pub fn router<P>(builder: ChartBuilder, layout: &PageLayout, assets: P) -> Router
where
    P: AsRef<Path>,
{
    let state = AppState {
        builder: Arc::new(builder),
        page: render_layout(layout).into(),
    };
    Router::new()
        .route("/", get(index))
        .route("/_update", post(update))
        .nest_service("/assets", ServeDir::new(assets.as_ref()))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.page.to_string())
}

async fn update(State(state): State<AppState>, Json(req): Json<UpdateRequest>) -> Response {
    log::info!("update callback with radio value {:?}", req.radio);
    let builder = state.builder.clone();
    let result = tokio::task::spawn_blocking(move || {
        builder
            .update(&req.radio)
            .and_then(|plot| plot.map(|p| figure_json(&p)).transpose())
    })
    .await;
    match result {
        Ok(Ok(figure)) => Json(UpdateResponse { figure }).into_response(),
        Ok(Err(e)) => error_response(e.to_string()),
        Err(e) => error_response(format!("update task failed: {}", e)),
    }
}

fn error_response(error: String) -> Response {
    log::error!("update callback failed: {}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error }),
    )
        .into_response()
}

/// Serve the dashboard on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), PondError> {
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartConfig, UpdateSink};
    use crate::ReadingTable;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router(csvin: &str, htmlout: &str, sink: UpdateSink) -> Router {
        let table = Arc::new(ReadingTable::from_csv(csvin).unwrap());
        let builder = ChartBuilder::new(table, ChartConfig::default(), htmlout, sink);
        router(builder, &PageLayout::default(), "./test")
    }

    fn update_request(radio: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/_update")
            .header("content-type", "application/json")
            .body(Body::from(format!("{{\"radio\":\"{}\"}}", radio)))
            .unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn layout_has_graph_radio_and_cards() {
        let html = render_layout(&PageLayout::default());
        assert!(html.contains(r#"<div id="graph"></div>"#));
        assert!(html.contains(r#"id="radio" data-value="Secondary""#));
        assert!(html.contains("Farm Pond Levels"));
        assert!(html.contains("Double click anywhere in the graph to reset zoom."));
        let sensor = concat!(
            r#"<div class="col-4"><div class="card">"#,
            r#"<img class="card-img-top" src="/assets/sensor.png">"#
        );
        let diagram = concat!(
            r#"<div class="col-5"><div class="card">"#,
            r#"<img class="card-img-top" src="/assets/diagram.png">"#
        );
        assert!(html.contains(sensor));
        assert!(html.contains(diagram));
        assert!(!html.contains("type=\"radio\""));
    }

    #[test]
    fn radio_options_mark_the_selected_value() {
        let layout = PageLayout {
            radio_options: vec!["Primary".to_owned(), "Secondary".to_owned()],
            ..PageLayout::default()
        };
        let html = render_layout(&layout);
        assert!(html.contains(r#"value="Secondary" checked"#));
        assert!(html.contains(r#"value="Primary">"#));
    }

    #[tokio::test]
    async fn index_serves_the_page() {
        let fout = "./test/dash_index.html";
        let app = test_router("./test/farm_data.csv", fout, UpdateSink::File);
        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains(r#"id="graph""#));
    }

    #[tokio::test]
    async fn file_sink_writes_but_returns_no_figure() {
        let fout = "./test/dash_update_file.html";
        let app = test_router("./test/farm_data.csv", fout, UpdateSink::File);
        let resp = app.oneshot(update_request("Secondary")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert!(body["figure"].is_null());
        assert!(Path::new(fout).is_file());
        std::fs::remove_file(fout).unwrap();
    }

    #[tokio::test]
    async fn both_sink_returns_the_figure() {
        let fout = "./test/dash_update_both.html";
        let app = test_router("./test/farm_data.csv", fout, UpdateSink::Both);
        let resp = app.oneshot(update_request("Secondary")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(body["figure"]["data"].as_array().unwrap().len(), 2);
        let pond_range = &body["figure"]["layout"]["yaxis"]["range"];
        assert_eq!(*pond_range, serde_json::json!([0.0, 4.0]));
        std::fs::remove_file(fout).unwrap();
    }

    #[tokio::test]
    async fn missing_column_is_a_server_error() {
        let fout = "./test/dash_update_missing.html";
        let app = test_router("./test/missing_rain.csv", fout, UpdateSink::Both);
        let resp = app.oneshot(update_request("Secondary")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert!(body["error"].as_str().unwrap().contains("Rain"));
        assert!(!Path::new(fout).exists());
    }

    #[tokio::test]
    async fn assets_are_served() {
        let fout = "./test/dash_assets.html";
        let app = test_router("./test/farm_data.csv", fout, UpdateSink::File);
        let req = Request::builder()
            .uri("/assets/farm_data.csv")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.starts_with("Date,PondLevel,Rain"));
    }
}
