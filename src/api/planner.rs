//! Resolves the two free-text location fields into a running route

use crate::api::animator::RouteAnimator;
use crate::core::{Coordinate, Route};
use crate::geocoding::Geocoder;
use crate::utils::config::{AnimationConfig, DegenerateRoutePolicy};
use crate::validation::error::{AnimationError, LocationField, Result};
use log::{info, warn};

/// Turns "from"/"to" text into a [`Route`] and starts it on an animator
pub struct RoutePlanner<G: Geocoder> {
    geocoder: G,
    degenerate_route_policy: DegenerateRoutePolicy,
    /// Text of the last accepted submission, used to prefill the next one
    last_locations: Option<(String, String)>,
}

impl<G: Geocoder> RoutePlanner<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            degenerate_route_policy: DegenerateRoutePolicy::Allow,
            last_locations: None,
        }
    }

    /// Create a planner using the policy from `config`
    pub fn from_config(geocoder: G, config: &AnimationConfig) -> Self {
        Self::new(geocoder).with_degenerate_route_policy(config.degenerate_route_policy)
    }

    pub fn with_degenerate_route_policy(mut self, policy: DegenerateRoutePolicy) -> Self {
        self.degenerate_route_policy = policy;
        self
    }

    pub fn degenerate_route_policy(&self) -> DegenerateRoutePolicy {
        self.degenerate_route_policy
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Last accepted (from, to) texts
    pub fn last_locations(&self) -> Option<(&str, &str)> {
        self.last_locations
            .as_ref()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    /// Resolve both fields without touching any animator
    ///
    /// The from field is checked completely before the to field.
    pub fn resolve(&self, from_text: &str, to_text: &str) -> Result<Route> {
        let origin = self.resolve_field(LocationField::From, from_text)?;
        let destination = self.resolve_field(LocationField::To, to_text)?;
        let route = Route::new(origin, destination);

        if route.is_degenerate() && self.degenerate_route_policy == DegenerateRoutePolicy::Reject {
            warn!("Rejecting route with identical endpoints {}", origin);
            return Err(AnimationError::DegenerateRoute);
        }
        Ok(route)
    }

    /// Resolve both fields and start the route on `animator`
    ///
    /// On error the animator is left untouched.
    pub fn submit(
        &mut self,
        from_text: &str,
        to_text: &str,
        animator: &mut RouteAnimator,
    ) -> Result<Route> {
        let route = self.resolve(from_text, to_text)?;
        self.last_locations = Some((from_text.trim().to_string(), to_text.trim().to_string()));
        info!("Starting route from '{}' to '{}'", from_text.trim(), to_text.trim());
        animator.start(route);
        Ok(route)
    }

    /// Stop whatever `animator` is running
    pub fn cancel(&self, animator: &mut RouteAnimator) {
        animator.cancel();
    }

    fn resolve_field(&self, field: LocationField, text: &str) -> Result<Coordinate> {
        let query = text.trim();
        if query.is_empty() {
            warn!("No text entered for the {} location", field);
            return Err(AnimationError::EmptyLocation { field });
        }

        match self.geocoder.lookup(query) {
            Ok(Some(coordinate)) => Ok(coordinate),
            Ok(None) => {
                warn!("Could not find the {} location '{}'", field, query);
                Err(AnimationError::LocationNotFound {
                    field,
                    query: query.to_string(),
                })
            }
            Err(source) => {
                warn!("Geocoder failed on the {} location: {}", field, source);
                Err(AnimationError::GeocoderUnavailable { field, source })
            }
        }
    }
}
