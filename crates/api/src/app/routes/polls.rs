use std::sync::Arc;

use axum::{
    extract::{Extension, Form, Path},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};

use pollsite_infra::{get_or_not_found, Lookup};
use pollsite_polls::{ChoiceId, Question, QuestionId};

use crate::app::dto::{self, DetailContext, IndexContext, ResultsContext};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::app::templates;

/// Number of questions on the index page.
pub const LATEST_LIMIT: usize = 5;

pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

pub fn router() -> Router {
    Router::new()
        .route("/polls/", get(index))
        .route("/polls/:question_id/", get(detail))
        .route("/polls/:question_id/results/", get(results))
        .route("/polls/:question_id/vote/", post(vote))
}

pub async fn index(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let questions = match services.store().latest_questions(LATEST_LIMIT).await {
        Ok(q) => q,
        Err(e) => return errors::store_error_to_response("latest_questions", e),
    };

    services.render(templates::INDEX, &IndexContext::new(&questions))
}

pub async fn detail(
    Extension(services): Extension<Arc<AppServices>>,
    Path(question_id): Path<String>,
) -> Response {
    let question = match question_or_404(&services, &question_id).await {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    render_detail(&services, &question, None).await
}

pub async fn results(
    Extension(services): Extension<Arc<AppServices>>,
    Path(question_id): Path<String>,
) -> Response {
    let question = match question_or_404(&services, &question_id).await {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    let choices = match services.store().choices_for(question.id_typed()).await {
        Ok(c) => c,
        Err(e) => return errors::store_error_to_response("choices_for", e),
    };

    services.render(templates::RESULTS, &ResultsContext::new(&question, &choices))
}

pub async fn vote(
    Extension(services): Extension<Arc<AppServices>>,
    Path(question_id): Path<String>,
    form: Option<Form<dto::VoteForm>>,
) -> Response {
    let question = match question_or_404(&services, &question_id).await {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    let selected = form
        .and_then(|Form(body)| body.choice)
        .and_then(|raw| raw.parse::<ChoiceId>().ok());
    let Some(choice_id) = selected else {
        return render_detail(&services, &question, Some(NO_CHOICE_SELECTED)).await;
    };

    match services.store().record_vote(question.id_typed(), choice_id).await {
        Ok(Lookup::Found(choice)) => {
            tracing::info!(
                question_id = %question.id_typed(),
                choice_id = %choice.id_typed(),
                votes = choice.votes(),
                "vote recorded"
            );
            Redirect::to(&format!("/polls/{}/results/", question.id_typed())).into_response()
        }
        Ok(Lookup::NotFound) => render_detail(&services, &question, Some(NO_CHOICE_SELECTED)).await,
        Err(e) => errors::store_error_to_response("record_vote", e),
    }
}

/// Resolve a raw path segment to a stored question.
///
/// Segments that are not plain digits cannot name a question, so they get the
/// same 404 as an unknown id.
async fn question_or_404(services: &AppServices, raw_id: &str) -> Result<Question, Response> {
    let Ok(id) = raw_id.parse::<QuestionId>() else {
        tracing::debug!(raw_id, "question id is not an integer");
        return Err(errors::not_found(errors::QUESTION_NOT_FOUND));
    };

    match get_or_not_found::<Question, _>(services.store(), &id).await {
        Ok(Lookup::Found(question)) => Ok(question),
        Ok(Lookup::NotFound) => Err(errors::not_found(errors::QUESTION_NOT_FOUND)),
        Err(e) => Err(errors::store_error_to_response("question lookup", e)),
    }
}

async fn render_detail(
    services: &AppServices,
    question: &Question,
    error_message: Option<&str>,
) -> Response {
    let choices = match services.store().choices_for(question.id_typed()).await {
        Ok(c) => c,
        Err(e) => return errors::store_error_to_response("choices_for", e),
    };

    services.render(
        templates::DETAIL,
        &DetailContext::new(question, &choices, error_message),
    )
}
