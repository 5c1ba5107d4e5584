//! HTTP-level tests for the Gemini client and generators.
#![allow(clippy::unwrap_used)] // Test code

use prettytickets_genai::{
    GeminiClient, GeminiConfig, GenAiError, ImageGenerator, MetadataGenerator, TicketInput,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig::new("test-key")
        .unwrap()
        .with_api_base(format!("{}/v1beta", server.uri()));
    GeminiClient::new(&config).unwrap()
}

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 300, "totalTokenCount": 420 }
    })
}

fn ticket_document() -> String {
    json!({
        "eventDetails": {
            "artistOrEvent": "Taylor Swift",
            "venue": "MetLife Stadium",
            "date": "08/15/2025",
            "seatInfo": "Sec 12 Row A",
            "personalMessage": "For Maya, love Dad"
        },
        "visualTheme": {
            "colorPalette": ["rose gold", "lavender", "midnight blue"],
            "textures": ["holographic foil"],
            "typography": { "headlineFont": "Playfair Display", "bodyFont": "Inter" },
            "moodKeywords": ["dreamy"],
            "iconIdeas": ["stars"]
        },
        "aiPrompts": {
            "backgroundPrompt": "A shimmering stadium under a lavender aurora",
            "ticketArtPrompt": "Glitter and stars"
        },
        "giftCopy": {
            "ticketTitle": "Your Taylor Swift Keepsake",
            "tagline": "The Eras Tour",
            "emotionalDescription": "A memory to last a lifetime",
            "giftMessage": "Happy birthday!"
        },
        "layoutGuide": {
            "recommendedLayout": "classic",
            "hierarchyNotes": "Artist first",
            "fontWeights": { "eventName": "bold", "seatInfo": "medium", "extras": "light" }
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_metadata_request_wire_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" },
            "contents": [{ "role": "user", "parts": [{ "text": "Taylor Swift, MetLife Stadium, 08/15/2025, Sec 12 Row A" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply(&ticket_document())))
        .expect(1)
        .mount(&server)
        .await;

    let generator = MetadataGenerator::new(client_for(&server));
    let record = generator
        .generate(&TicketInput::text(
            "Taylor Swift, MetLife Stadium, 08/15/2025, Sec 12 Row A",
        ))
        .await
        .unwrap();

    assert_eq!(record.event_details.artist_or_event, "Taylor Swift");
    assert_eq!(record.event_details.seat_info, "Sec 12 Row A");
    assert_eq!(record.visual_theme.color_palette.len(), 3);
    assert_eq!(record.gift_copy.tagline, "The Eras Tour");
    assert!(record.ai_prompts.cached_image.is_none());
}

#[tokio::test]
async fn test_response_schema_sent_as_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply(&ticket_document())))
        .mount(&server)
        .await;

    MetadataGenerator::new(client_for(&server))
        .generate(&TicketInput::text("Muse at Wembley"))
        .await
        .unwrap();

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let schema = &body["generationConfig"]["responseSchema"];

    assert_eq!(schema["type"], "OBJECT");
    assert_eq!(schema["properties"]["eventDetails"]["type"], "OBJECT");
    assert_eq!(
        schema["properties"]["visualTheme"]["properties"]["colorPalette"]["items"]["type"],
        "STRING"
    );
    assert!(
        schema["properties"]["eventDetails"]["required"]
            .as_array()
            .unwrap()
            .contains(&json!("venue"))
    );
    assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
}

#[tokio::test]
async fn test_image_input_sent_without_data_uri_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [
                { "text": "Analyze this ticket image and extract details to create a collectible design." },
                { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/4AAQ" } }
            ] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply(&ticket_document())))
        .expect(1)
        .mount(&server)
        .await;

    MetadataGenerator::new(client_for(&server))
        .generate(&TicketInput::image("data:image/jpeg;base64,/9j/4AAQ"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_status_codes_map_to_errors() {
    let server = MockServer::start().await;
    Mock::given(path("/v1beta/models/limited:generateContent"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(path("/v1beta/models/locked:generateContent"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(path("/v1beta/models/broken:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = TicketInput::text("Muse");

    let err = MetadataGenerator::new(client.clone())
        .with_model_name("limited")
        .generate(&input)
        .await
        .unwrap_err();
    assert!(matches!(err, GenAiError::RateLimited));

    let err = MetadataGenerator::new(client.clone())
        .with_model_name("locked")
        .generate(&input)
        .await
        .unwrap_err();
    assert!(matches!(err, GenAiError::Unauthorized));

    let err = MetadataGenerator::new(client)
        .with_model_name("broken")
        .generate(&input)
        .await
        .unwrap_err();
    match err {
        GenAiError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_image_generation_returns_data_uri() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash-image:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseModalities": ["IMAGE", "TEXT"],
                "imageConfig": { "aspectRatio": "16:9" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
            ] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = ImageGenerator::new(client_for(&server))
        .generate("A shimmering stadium under a lavender aurora")
        .await;

    assert_eq!(outcome.data_uri(), "data:image/png;base64,iVBORw0KGgo=");
}

#[tokio::test]
async fn test_image_generation_failure_yields_empty_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let outcome = ImageGenerator::new(client_for(&server))
        .generate("A shimmering stadium")
        .await;

    assert!(!outcome.is_generated());
    assert_eq!(outcome.data_uri(), "");
}
