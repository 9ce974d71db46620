#![warn(missing_docs)]

//! Service API template assertions
//!
//! Models declare `datasources`, `services`, `rest_resources` and `data_accesses`
//! alongside the shared `project` section. [`service_api_assertion`] returns a
//! [`TemplateAssertion`] wired with the resolvers for all of them.

pub mod model;
pub mod resolver;

use tmplassert_engine::{AssertionResult, HarnessConfig, TemplateAssertion};
use tmplassert_model::{ProjectEntryResolver, ResolverRegistry};

// Re-export public API
pub use model::{
    DataAccess, DataAccessList, Datasource, DatasourceList, EntityList, Named, RestResource,
    RestResourceList, Service, ServiceList,
};
pub use resolver::{
    ServiceApiEntryResolver, ServiceApiModel, DATASOURCES_KEY, DATA_ACCESSES_KEY,
    REST_RESOURCES_KEY, SERVICES_KEY,
};

/// Project and service API resolvers, in that order
pub fn service_api_resolvers() -> ResolverRegistry {
    ResolverRegistry::new()
        .with(ProjectEntryResolver::new())
        .with(ServiceApiEntryResolver::new())
}

/// An assertion over service API models with default settings
pub fn service_api_assertion() -> TemplateAssertion {
    TemplateAssertion::new(service_api_resolvers())
}

/// An assertion over service API models with the given settings
pub fn service_api_assertion_with_config(
    config: HarnessConfig,
) -> AssertionResult<TemplateAssertion> {
    TemplateAssertion::with_config(service_api_resolvers(), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_order() {
        assert_eq!(service_api_resolvers().names(), vec!["project", "service-api"]);
    }

    #[test]
    fn test_assertion_uses_service_api_resolvers() {
        let mut assertion = service_api_assertion();
        assertion
            .with_model_text("project:\n  name: shop\nservices:\n  - name: Orders\n")
            .unwrap();

        let model = assertion.model().unwrap();
        assert_eq!(model.services().names(), vec!["Orders"]);
        assert!(model.datasources().is_empty());
        assert!(model.contains_key("project"));
    }
}
