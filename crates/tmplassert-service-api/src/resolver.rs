//! Resolver for the service API collections

use tmplassert_model::{read_sequence, Model, ModelEntryResolver, ModelResult, RawDocument};
use tracing::debug;

use crate::model::{DataAccessList, DatasourceList, EntityList, RestResourceList, ServiceList};

/// Model key of the datasource list
pub const DATASOURCES_KEY: &str = "datasources";
/// Model key of the service list
pub const SERVICES_KEY: &str = "services";
/// Model key of the REST resource list
pub const REST_RESOURCES_KEY: &str = "rest_resources";
/// Model key of the data access list
pub const DATA_ACCESSES_KEY: &str = "data_accesses";

/// Stores datasources, services, REST resources and data accesses
///
/// Every list is stored, empty when its section is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceApiEntryResolver;

impl ServiceApiEntryResolver {
    /// Create the resolver
    pub fn new() -> Self {
        Self
    }
}

impl ModelEntryResolver for ServiceApiEntryResolver {
    fn name(&self) -> &str {
        "service-api"
    }

    fn resolve(&self, document: &RawDocument, model: &mut Model) -> ModelResult<()> {
        let datasources =
            DatasourceList::new(read_sequence(document, DATASOURCES_KEY, self.name())?);
        let services = ServiceList::new(read_sequence(document, SERVICES_KEY, self.name())?);
        let rest_resources =
            RestResourceList::new(read_sequence(document, REST_RESOURCES_KEY, self.name())?);
        let data_accesses =
            DataAccessList::new(read_sequence(document, DATA_ACCESSES_KEY, self.name())?);

        debug!(
            "Resolved {} datasources, {} services, {} rest resources, {} data accesses",
            datasources.len(),
            services.len(),
            rest_resources.len(),
            data_accesses.len()
        );

        model.insert(DATASOURCES_KEY, datasources)?;
        model.insert(SERVICES_KEY, services)?;
        model.insert(REST_RESOURCES_KEY, rest_resources)?;
        model.insert(DATA_ACCESSES_KEY, data_accesses)?;
        Ok(())
    }
}

/// Typed access to the service API entries of a model
pub trait ServiceApiModel {
    /// All datasources
    fn datasources(&self) -> &DatasourceList;
    /// All services
    fn services(&self) -> &ServiceList;
    /// All REST resources
    fn rest_resources(&self) -> &RestResourceList;
    /// All data accesses
    fn data_accesses(&self) -> &DataAccessList;
}

static NO_DATASOURCES: DatasourceList = EntityList::empty();
static NO_SERVICES: ServiceList = EntityList::empty();
static NO_REST_RESOURCES: RestResourceList = EntityList::empty();
static NO_DATA_ACCESSES: DataAccessList = EntityList::empty();

// Models built without the resolver read as empty
impl ServiceApiModel for Model {
    fn datasources(&self) -> &DatasourceList {
        self.get(DATASOURCES_KEY).unwrap_or(&NO_DATASOURCES)
    }

    fn services(&self) -> &ServiceList {
        self.get(SERVICES_KEY).unwrap_or(&NO_SERVICES)
    }

    fn rest_resources(&self) -> &RestResourceList {
        self.get(REST_RESOURCES_KEY).unwrap_or(&NO_REST_RESOURCES)
    }

    fn data_accesses(&self) -> &DataAccessList {
        self.get(DATA_ACCESSES_KEY).unwrap_or(&NO_DATA_ACCESSES)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;
    use tmplassert_model::{ModelError, ResolverRegistry};

    use super::*;

    fn resolve(text: &str) -> ModelResult<Model> {
        let document = RawDocument::parse(text, Path::new("model.yml"))?;
        ResolverRegistry::new()
            .with(ServiceApiEntryResolver::new())
            .resolve_all(&document)
    }

    #[test]
    fn test_resolves_all_collections() {
        let model = resolve(
            "datasources:\n  - name: main\n    type: postgres\nservices:\n  - name: Orders\nrest_resources:\n  - name: order\n    service: Orders\ndata_accesses:\n  - name: order_access\n    datasource: main\n",
        )
        .unwrap();

        assert_eq!(model.datasources().names(), vec!["main"]);
        assert_eq!(model.services().names(), vec!["Orders"]);
        let resource = model.rest_resources().find("order").unwrap();
        assert_eq!(resource.service_in(model.services()).unwrap().name, "Orders");
        let access = model.data_accesses().find("order_access").unwrap();
        assert_eq!(
            access.datasource_in(model.datasources()).unwrap().kind.as_deref(),
            Some("postgres")
        );
    }

    #[test]
    fn test_absent_sections_are_empty() {
        let model = resolve("services:\n  - name: Orders\n").unwrap();

        assert!(model.datasources().is_empty());
        assert!(model.rest_resources().is_empty());
        assert_eq!(model.value(DATASOURCES_KEY), Some(&json!([])));
        assert_eq!(model.value(DATA_ACCESSES_KEY), Some(&json!([])));
    }

    #[test]
    fn test_model_without_resolver_reads_empty() {
        let model = Model::new();
        assert!(model.services().is_empty());
        assert!(model.data_accesses().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_resolve_error() {
        let err = resolve("services:\n  name: Orders\n").unwrap_err();
        match err {
            ModelError::Resolve { resolver, key, .. } => {
                assert_eq!(resolver, "service-api");
                assert_eq!(key, "services");
            }
            other => panic!("expected resolve error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_name_is_resolve_error() {
        let err = resolve("datasources:\n  - type: postgres\n").unwrap_err();
        assert!(matches!(err, ModelError::Resolve { ref key, .. } if key == "datasources"));
    }
}
