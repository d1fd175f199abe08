use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chat Relay",
        version = "0.1.0",
        description = "Chat widget → automation webhook relay. Validates and sanitizes messages, calls the webhook, and always answers with a displayable reply."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local dev")
    ),
    tags(
        (name = "relay", description = "Chat widget endpoint"),
        (name = "health", description = "Liveness probe")
    ),
    // Handlers (paths)
    paths(
        crate::routes::relay::receive_chat,
        crate::routes::health::health,
    ),
    // Schemas used in requests/responses
    components(
        schemas(
            crate::models::relay::ChatRequestDoc,
            crate::models::relay::RelayResponse,
            crate::models::common::ErrorMessage,
            crate::models::common::HealthStatus
        )
    )
)]
pub struct ApiDoc;
