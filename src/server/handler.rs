use actix_web::{http::Method, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::{
    error::Result,
    gemini::ImageClient,
    models::{
        ErrorResponse, GeneratedImage, GenerationRequest, ImageGenerationResponse,
        GENERATION_FAILED, METHOD_NOT_ALLOWED, NO_IMAGE_GENERATED, PROMPT_REQUIRED,
    },
    server::AppState,
};

enum Outcome {
    Generated(GeneratedImage),
    MissingPrompt,
    NoImage,
}

/// `/api/generate-image`
///
/// 405 for anything but POST, 400 without a prompt, 200 with the first
/// inline image, 500 when the model returns none or anything fails.
pub async fn generate_image(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    if req.method() != Method::POST {
        return HttpResponse::MethodNotAllowed().json(ErrorResponse::new(METHOD_NOT_ALLOWED));
    }

    let request_id = Uuid::new_v4();
    log::debug!("[req:{}] Image generation request ({} bytes)", request_id, body.len());

    match process(&body, &state.images).await {
        Ok(Outcome::Generated(image)) => {
            log::info!("[req:{}] Returning {} image", request_id, image.mime_type);
            HttpResponse::Ok().json(ImageGenerationResponse::from(image))
        }
        Ok(Outcome::MissingPrompt) => {
            log::warn!("[req:{}] Rejected: no prompt", request_id);
            HttpResponse::BadRequest().json(ErrorResponse::new(PROMPT_REQUIRED))
        }
        Ok(Outcome::NoImage) => {
            HttpResponse::InternalServerError().json(ErrorResponse::new(NO_IMAGE_GENERATED))
        }
        Err(e) => {
            log::error!("[req:{}] Error generating image: {}", request_id, e);
            let mut response = ErrorResponse::new(GENERATION_FAILED);
            if state.expose_error_details {
                response = response.with_details(e.to_string());
            }
            HttpResponse::InternalServerError().json(response)
        }
    }
}

async fn process(body: &[u8], images: &ImageClient) -> Result<Outcome> {
    let request = GenerationRequest::from_body(body)?;
    let Some(contents) = request.to_contents() else {
        return Ok(Outcome::MissingPrompt);
    };

    Ok(match images.generate(contents).await? {
        Some(image) => Outcome::Generated(image),
        None => Outcome::NoImage,
    })
}
