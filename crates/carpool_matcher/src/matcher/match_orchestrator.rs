use std::collections::HashSet;

use carpool_providers::{location::Location, routing_service::RoutingService};
use tracing::{error, info, instrument, warn};

use crate::{
    matcher::{
        candidate_selector::select_all_candidates,
        intersection_resolver::IntersectionResolver,
        match_error::MatchError,
        match_result::{Degradation, DriverRoute, MatchResult, ResolvedCompanion},
        matcher_params::MatcherParams,
    },
    problem::{companion::Companion, driver::Driver},
    timer_debug,
};

/// The active participants of one matching run.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub office: Location,
    pub drivers: Vec<Driver>,
    pub companions: Vec<Companion>,
}

pub struct MatchOrchestrator<R> {
    routing: R,
    params: MatcherParams,
}

impl<R: RoutingService> MatchOrchestrator<R> {
    pub fn new(routing: R, params: MatcherParams) -> Self {
        Self { routing, params }
    }

    pub fn routing(&self) -> &R {
        &self.routing
    }

    /// Runs one matching pass.
    ///
    /// Fails only when the routing service is unreachable. Companions that
    /// cannot be geocoded, drivers without a route and repeated ids (after
    /// the first occurrence) are left out and reported in
    /// [`MatchResult::degradations`]; a run without a feasible pair returns
    /// an empty assignment list.
    #[instrument(
        skip_all,
        fields(drivers = request.drivers.len(), companions = request.companions.len())
    )]
    pub async fn run(&self, request: MatchRequest) -> Result<MatchResult, MatchError> {
        if !self.routing.check_connectivity().await {
            error!("Unable to connect to the routing service");
            return Err(MatchError::Connectivity);
        }

        info!("Routing service connected");

        let mut degradations = Vec::new();

        let companions = self
            .resolve_companions(&request.companions, &mut degradations)
            .await;
        let driver_routes = self
            .fetch_driver_routes(&request.drivers, &request.office, &mut degradations)
            .await;

        let candidates_by_pair = timer_debug!(
            "Candidate selection",
            select_all_candidates(&driver_routes, &companions, self.params.candidate_count)
        );

        let resolution = IntersectionResolver::new(&self.routing, &self.params)
            .resolve_best(&candidates_by_pair, self.params.buffer_minutes)
            .await;

        Ok(MatchResult {
            office: request.office,
            drivers: request.drivers,
            companions: request.companions,
            assignments: resolution.assignment.into_iter().collect(),
            driver_routes,
            ranked_pairs: resolution.ranked_pairs,
            degradations,
        })
    }

    async fn resolve_companions(
        &self,
        companions: &[Companion],
        degradations: &mut Vec<Degradation>,
    ) -> Vec<ResolvedCompanion> {
        let mut resolved = Vec::with_capacity(companions.len());
        let mut seen = HashSet::with_capacity(companions.len());

        for companion in companions {
            if !seen.insert(companion.id.as_str()) {
                warn!(companion_id = %companion.id, "Duplicate companion id, skipping request");
                degradations.push(Degradation::DuplicateCompanion {
                    companion_id: companion.id.clone(),
                });
                continue;
            }

            let coordinate = match &companion.location {
                Location::Coordinate(coordinate) => Ok(*coordinate),
                Location::Address { address } => self.routing.geocode(address).await,
            };

            match coordinate {
                Ok(coordinate) => resolved.push(ResolvedCompanion::new(&companion.id, coordinate)),
                Err(err) => {
                    warn!(
                        companion_id = %companion.id,
                        location = %companion.location,
                        error = %err,
                        "Failed to geocode companion"
                    );
                    degradations.push(Degradation::Geocode {
                        companion_id: companion.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        resolved
    }

    async fn fetch_driver_routes(
        &self,
        drivers: &[Driver],
        office: &Location,
        degradations: &mut Vec<Degradation>,
    ) -> Vec<DriverRoute> {
        let mut driver_routes = Vec::with_capacity(drivers.len());
        let mut seen = HashSet::with_capacity(drivers.len());

        for driver in drivers {
            if !seen.insert(driver.id.as_str()) {
                warn!(driver_id = %driver.id, "Duplicate driver id, skipping offer");
                degradations.push(Degradation::DuplicateDriver {
                    driver_id: driver.id.clone(),
                });
                continue;
            }

            let reason = match self
                .routing
                .route(&driver.location, office, self.params.travel_mode)
                .await
            {
                Ok(route) if !route.is_empty() => {
                    driver_routes.push(DriverRoute::new(&driver.id, route));
                    continue;
                }
                Ok(_) => "route has no path".to_owned(),
                Err(err) => err.to_string(),
            };

            warn!(
                driver_id = %driver.id,
                location = %driver.location,
                reason = %reason,
                "Failed to fetch driver route"
            );
            degradations.push(Degradation::Route {
                driver_id: driver.id.clone(),
                reason,
            });
        }

        driver_routes
    }
}
