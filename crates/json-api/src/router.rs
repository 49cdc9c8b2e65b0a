//! App Router

use salvo::Router;

use crate::{campaigns, codes, redemptions, tenants, validation};

/// Every tenant-scoped route. Literal segments sit before `{uuid}` wisps so
/// `/campaigns/live` and `/codes/validate` are never swallowed by a
/// parameter match.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(tenants::middleware)
        .push(
            Router::with_path("campaigns")
                .get(campaigns::index::handler)
                .post(campaigns::create::handler)
                .push(Router::with_path("live").get(campaigns::live::handler))
                .push(
                    Router::with_path("{campaign}")
                        .push(
                            Router::with_path("codes")
                                .get(codes::index::handler)
                                .post(codes::create::handler)
                                .push(
                                    Router::with_path("generate").post(codes::generate::handler),
                                ),
                        )
                        .push(Router::with_path("codes.csv").get(codes::export::handler)),
                )
                .push(
                    Router::with_path("{uuid}")
                        .get(campaigns::get::handler)
                        .put(campaigns::update::handler)
                        .delete(campaigns::delete::handler)
                        .push(Router::with_path("activate").post(campaigns::transitions::activate))
                        .push(Router::with_path("pause").post(campaigns::transitions::pause))
                        .push(Router::with_path("expire").post(campaigns::transitions::expire))
                        .push(Router::with_path("stats").get(campaigns::stats::handler)),
                ),
        )
        .push(
            Router::with_path("codes")
                .push(Router::with_path("validate").post(validation::validate::handler))
                .push(Router::with_path("redeem").post(redemptions::redeem::handler))
                .push(
                    Router::with_path("{uuid}")
                        .get(codes::get::handler)
                        .push(Router::with_path("assign").post(codes::assign::handler))
                        .push(Router::with_path("deactivate").post(codes::deactivate::handler))
                        .push(Router::with_path("reactivate").post(codes::reactivate::handler)),
                ),
        )
        .push(
            Router::with_path("generation-jobs/{uuid}")
                .get(codes::jobs::get::handler)
                .push(Router::with_path("cancel").post(codes::jobs::cancel::handler))
                .push(Router::with_path("resume").post(codes::jobs::resume::handler)),
        )
        .push(
            Router::with_path("redemptions")
                .get(redemptions::index::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(redemptions::get::handler)
                        .push(Router::with_path("reverse").post(redemptions::reverse::handler)),
                ),
        )
}
