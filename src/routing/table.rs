//! Route table construction.
//!
//! # Responsibilities
//! - Walk a context's members once and compile every routable name
//! - Order handlers and mounts deterministically before registration
//! - Reject tables the router cannot hold, before the router is built
//! - Register each handler's dispatch adapter and each mount's sub-service
//!
//! # Design Decisions
//! - Ordering: shorter names first, ties broken lexicographically
//! - A later registration for the same verb and pattern replaces the
//!   earlier one; `Handle` claims every verb on its pattern
//! - One `MethodRouter` per distinct pattern, so axum never sees an
//!   overlapping method route
//! - Conflicts are found with a shadow matchit tree so bootstrap fails with
//!   an error rather than a panic inside `Router::route`

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;

use crate::context::methods::MemberKind;
use crate::context::{Context, MethodSet, Provider};
use crate::error::BootstrapError;
use crate::http::dispatch::DispatchAdapter;
use crate::routing::compiler::{parse_handler, parse_mount, PathPattern, Verb};

/// What a member name compiled to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledRoute {
    Handler { verb: Verb, pattern: PathPattern },
    Mount { prefix: PathPattern },
}

/// The compiled decision for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Member name as declared.
    pub name: String,
    /// Position of the member in its `MethodSet`.
    pub index: usize,
    pub route: CompiledRoute,
}

impl MethodDescriptor {
    /// The pattern as listed by the server: mounts end in `/*`.
    pub fn listed_pattern(&self) -> String {
        match &self.route {
            CompiledRoute::Handler { pattern, .. } => pattern.to_string(),
            CompiledRoute::Mount { prefix } if prefix.is_root() => "/*".to_string(),
            CompiledRoute::Mount { prefix } => format!("{}/*", prefix),
        }
    }
}

/// Registration order: name length ascending, then name ascending.
fn by_length_then_name(a: &MethodDescriptor, b: &MethodDescriptor) -> std::cmp::Ordering {
    a.name
        .len()
        .cmp(&b.name.len())
        .then_with(|| a.name.cmp(&b.name))
}

/// Member indices registered on one pattern, per HTTP method.
#[derive(Debug, Default, Clone)]
struct Endpoints {
    /// Indexed like `Verb::METHODS`.
    by_method: [Option<usize>; 9],
    /// Catches methods outside `Verb::METHODS`.
    any: Option<usize>,
}

fn method_filter(verb: Verb) -> Option<MethodFilter> {
    Some(match verb {
        Verb::Get => MethodFilter::GET,
        Verb::Put => MethodFilter::PUT,
        Verb::Post => MethodFilter::POST,
        Verb::Patch => MethodFilter::PATCH,
        Verb::Delete => MethodFilter::DELETE,
        Verb::Trace => MethodFilter::TRACE,
        Verb::Options => MethodFilter::OPTIONS,
        Verb::Connect => MethodFilter::CONNECT,
        Verb::Head => MethodFilter::HEAD,
        Verb::Handle => return None,
    })
}

/// Compiled, ordered routes of one context type.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    handlers: Vec<MethodDescriptor>,
    mounts: Vec<MethodDescriptor>,
}

impl RouteTable {
    /// Compiles every member of `methods`. Unroutable members are skipped.
    pub fn compile<C>(methods: &MethodSet<C>) -> Self {
        let mut handlers = Vec::new();
        let mut mounts = Vec::new();

        for (index, member) in methods.members().iter().enumerate() {
            let route = match member.kind {
                MemberKind::Handler(_) => parse_handler(&member.name)
                    .map(|(verb, pattern)| CompiledRoute::Handler { verb, pattern }),
                MemberKind::Mount(_) => {
                    parse_mount(&member.name).map(|prefix| CompiledRoute::Mount { prefix })
                }
                MemberKind::Other => None,
            };

            let Some(route) = route else {
                tracing::trace!(member = %member.name, "Skipping unroutable member");
                continue;
            };

            let descriptor = MethodDescriptor {
                name: member.name.clone(),
                index,
                route,
            };
            match descriptor.route {
                CompiledRoute::Handler { .. } => handlers.push(descriptor),
                CompiledRoute::Mount { .. } => mounts.push(descriptor),
            }
        }

        handlers.sort_by(by_length_then_name);
        mounts.sort_by(by_length_then_name);

        Self { handlers, mounts }
    }

    /// Handler descriptors in registration order.
    pub fn handlers(&self) -> &[MethodDescriptor] {
        &self.handlers
    }

    /// Mount descriptors in registration order.
    pub fn mounts(&self) -> &[MethodDescriptor] {
        &self.mounts
    }

    /// Distinct patterns that end up registered.
    pub fn patterns(&self) -> BTreeSet<String> {
        self.handlers
            .iter()
            .chain(&self.mounts)
            .map(MethodDescriptor::listed_pattern)
            .collect()
    }

    /// Resolves handler registrations per pattern, later ones replacing
    /// earlier ones on the same method.
    fn endpoints(&self) -> BTreeMap<String, Endpoints> {
        let mut table: BTreeMap<String, Endpoints> = BTreeMap::new();

        for descriptor in &self.handlers {
            let CompiledRoute::Handler { verb, pattern } = &descriptor.route else {
                continue;
            };
            let pattern = pattern.to_string();
            let endpoints = table.entry(pattern.clone()).or_default();

            match Verb::METHODS.iter().position(|v| v == verb) {
                Some(slot) => {
                    if let Some(previous) = endpoints.by_method[slot].replace(descriptor.index) {
                        tracing::warn!(
                            member = %descriptor.name,
                            replaced_index = previous,
                            method = %verb,
                            pattern = %pattern,
                            "Route replaces an earlier registration"
                        );
                    }
                }
                None => {
                    endpoints.by_method = [Some(descriptor.index); 9];
                    endpoints.any = Some(descriptor.index);
                }
            }
        }

        table
    }

    /// Checks that every pattern fits into one routing tree.
    pub fn check_conflicts(&self) -> Result<(), BootstrapError> {
        let mut shadow = matchit::Router::new();
        let mut seen = BTreeSet::new();

        for descriptor in &self.handlers {
            let CompiledRoute::Handler { pattern, .. } = &descriptor.route else {
                continue;
            };
            let pattern = pattern.to_string();
            if !seen.insert(pattern.clone()) {
                continue;
            }
            shadow
                .insert(pattern.clone(), ())
                .map_err(|e| BootstrapError::Conflict {
                    member: descriptor.name.clone(),
                    pattern,
                    reason: e.to_string(),
                })?;
        }

        for descriptor in &self.mounts {
            let CompiledRoute::Mount { prefix } = &descriptor.route else {
                continue;
            };
            if prefix.is_root() {
                continue;
            }
            let prefix = prefix.to_string();
            // The same three paths axum claims when nesting a service.
            for path in [
                prefix.clone(),
                format!("{}/", prefix),
                format!("{}/{{*rest}}", prefix),
            ] {
                shadow
                    .insert(path, ())
                    .map_err(|e| BootstrapError::Conflict {
                        member: descriptor.name.clone(),
                        pattern: prefix.clone(),
                        reason: e.to_string(),
                    })?;
            }
        }

        Ok(())
    }

    /// Registers every route on a fresh router.
    ///
    /// Mount members are invoked on `instance`, once each.
    pub(crate) fn register<C: Context>(
        &self,
        instance: &C,
        methods: Arc<MethodSet<C>>,
        provider: &Provider<C>,
    ) -> Router {
        let mut router = Router::new();

        for (pattern, endpoints) in self.endpoints() {
            let adapter = |index: usize| {
                DispatchAdapter::new(provider.clone(), Arc::clone(&methods), index)
            };

            let mut route: MethodRouter = MethodRouter::new();
            for (verb, slot) in Verb::METHODS.iter().zip(endpoints.by_method) {
                if let (Some(index), Some(filter)) = (slot, method_filter(*verb)) {
                    route = route.on_service(filter, adapter(index));
                }
            }
            if let Some(index) = endpoints.any {
                route = route.fallback_service(adapter(index));
            }

            tracing::debug!(pattern = %pattern, "Registering route");
            router = router.route(&pattern, route);
        }

        for descriptor in &self.mounts {
            let CompiledRoute::Mount { prefix } = &descriptor.route else {
                continue;
            };
            let Some(MemberKind::Mount(mount)) =
                methods.members().get(descriptor.index).map(|m| &m.kind)
            else {
                continue;
            };

            let prefix = prefix.to_string();
            tracing::debug!(member = %descriptor.name, prefix = %prefix, "Mounting sub-handler");
            router = mount(instance).install(router, &prefix);
        }

        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Request;
    use axum::http::StatusCode;

    struct Sample;

    impl Sample {
        async fn ok(self, _req: Request) -> StatusCode {
            StatusCode::OK
        }

        fn web(&self) -> Router {
            Router::new()
        }
    }

    fn table(methods: MethodSet<Sample>) -> RouteTable {
        RouteTable::compile(&methods)
    }

    impl Context for Sample {
        fn methods(&self) -> MethodSet<Self> {
            MethodSet::new()
                .handler("GetOtherByID", Self::ok)
                .handler("HandleRoot", Self::ok)
                .mount("MountWeb", Self::web)
                .member("UseOther")
                .handler("Helper", Self::ok)
        }
    }

    #[test]
    fn test_compile_classifies_members() {
        let table = table(Sample.methods());
        let handlers: Vec<_> = table.handlers().iter().map(|d| d.name.as_str()).collect();
        let mounts: Vec<_> = table.mounts().iter().map(|d| d.name.as_str()).collect();

        assert_eq!(handlers, vec!["HandleRoot", "GetOtherByID"]);
        assert_eq!(mounts, vec!["MountWeb"]);
    }

    #[test]
    fn test_descriptors_keep_member_index() {
        let table = table(Sample.methods());
        let root = &table.handlers()[0];
        assert_eq!(root.index, 1);
        assert_eq!(
            root.route,
            CompiledRoute::Handler {
                verb: Verb::Handle,
                pattern: parse_handler("HandleRoot").unwrap().1,
            }
        );
        assert_eq!(table.mounts()[0].index, 2);
    }

    #[test]
    fn test_order_is_length_then_name() {
        let table = table(
            MethodSet::new()
                .handler("GetZebra", Sample::ok)
                .handler("GetAbc", Sample::ok)
                .handler("GetApple", Sample::ok)
                .handler("GetB", Sample::ok),
        );
        let names: Vec<_> = table.handlers().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["GetB", "GetAbc", "GetApple", "GetZebra"]);
    }

    #[test]
    fn test_patterns_are_deduplicated() {
        let table = table(
            MethodSet::new()
                .handler("GetRoot", Sample::ok)
                .handler("PostRoot", Sample::ok)
                .mount("MountRoot", Sample::web),
        );
        let patterns: Vec<_> = table.patterns().into_iter().collect();
        assert_eq!(patterns, vec!["/", "/*"]);
    }

    #[test]
    fn test_later_registration_wins() {
        let table = table(
            MethodSet::new()
                .handler("GetOther", Sample::ok)
                .handler("GetOTHER", Sample::ok),
        );
        let endpoints = table.endpoints();
        // GetOTHER sorts before GetOther, so GetOther (index 0) is kept.
        assert_eq!(endpoints["/other"].by_method[0], Some(0));
    }

    #[test]
    fn test_handle_claims_every_method() {
        let table = table(
            MethodSet::new()
                .handler("HandleRoot", Sample::ok)
                .handler("GetRoot", Sample::ok),
        );
        let endpoints = &table.endpoints()["/"];
        // GetRoot registers first, HandleRoot then takes every method.
        assert_eq!(endpoints.by_method, [Some(0); 9]);
        assert_eq!(endpoints.any, Some(0));
    }

    #[test]
    fn test_conflicting_params_are_rejected() {
        let table = table(
            MethodSet::new()
                .handler("GetRootByID", Sample::ok)
                .handler("PutRootByName", Sample::ok),
        );
        let err = table.check_conflicts().unwrap_err();
        assert!(matches!(err, BootstrapError::Conflict { .. }));
    }

    #[test]
    fn test_mount_colliding_with_route_is_rejected() {
        let table = table(
            MethodSet::new()
                .handler("GetWeb", Sample::ok)
                .mount("MountWeb", Sample::web),
        );
        assert!(table.check_conflicts().is_err());

        let table = table_ok();
        assert!(table.check_conflicts().is_ok());
    }

    #[test]
    fn test_mount_beside_param_route_is_rejected() {
        let table = table(
            MethodSet::new()
                .handler("GetWebByID", Sample::ok)
                .mount("MountWeb", Sample::web),
        );
        match table.check_conflicts() {
            Err(BootstrapError::Conflict { member, pattern, .. }) => {
                assert_eq!(member, "MountWeb");
                assert_eq!(pattern, "/web");
            }
            other => panic!("expected a conflict, got {:?}", other),
        }
    }

    fn table_ok() -> RouteTable {
        table(Sample.methods())
    }
}
