//! Where each artifact of one service lives, and how Python imports it.
//!
//! Import paths are derived once from the configured output paths so every
//! emitter agrees on them.

use std::path::{Path, PathBuf};

use e2egen_core::artifact::{service_dir, service_file, top_level};
use e2egen_core::config::OutputPaths;
use e2egen_core::grouping::GroupName;
use e2egen_core::naming::{
    import_path, module_name, service_fixture_name, service_module, settings_field_name,
};

/// File name (without extension) of the shared settings module.
pub const SETTINGS_MODULE: &str = "base_settings";
/// File name (without extension) of the shared fixture module.
pub const BASE_FIXTURE_MODULE: &str = "base";

#[derive(Debug, Clone)]
pub struct Layout {
    pub service_name: String,
    pub service_module: String,
    /// Attribute of the settings class holding this service's base URL.
    pub settings_field: String,
    paths: OutputPaths,
    internal_dir: PathBuf,
    clients_dir: PathBuf,
    tests_dir: PathBuf,
}

impl Layout {
    pub fn new(service_name: &str, paths: &OutputPaths) -> Self {
        let module = service_module(service_name);
        Self {
            service_name: service_name.to_string(),
            internal_dir: service_dir(&paths.internal_clients, &module),
            clients_dir: service_dir(&paths.clients, &module),
            tests_dir: service_dir(&paths.tests, &module),
            service_module: module,
            settings_field: settings_field_name(service_name),
            paths: paths.clone(),
        }
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// Package root of a family of artifacts: the first directory of its base.
    pub fn package_root(base: &Path) -> PathBuf {
        top_level(base)
    }

    // Low-level client layer.

    pub fn internal_dir(&self) -> &Path {
        &self.internal_dir
    }

    pub fn api_module_path(&self, group: &GroupName) -> PathBuf {
        self.internal_dir
            .join("apis")
            .join(format!("{}_api.py", module_name(group)))
    }

    pub fn api_import(&self, group: &GroupName) -> String {
        module_import(&self.api_module_path(group))
    }

    pub fn models_path(&self) -> PathBuf {
        self.internal_dir.join("models").join("api_models.py")
    }

    pub fn models_import(&self) -> String {
        module_import(&self.models_path())
    }

    // Child clients.

    pub fn clients_dir(&self) -> &Path {
        &self.clients_dir
    }

    pub fn client_path(&self, group: &GroupName) -> PathBuf {
        self.clients_dir.join(format!("{}_client.py", module_name(group)))
    }

    pub fn client_import(&self, group: &GroupName) -> String {
        module_import(&self.client_path(group))
    }

    // Fixtures and settings.

    pub fn fixtures_package(&self) -> String {
        import_path(&self.paths.fixtures)
    }

    pub fn base_fixture_path(&self) -> PathBuf {
        self.paths.fixtures.join(format!("{BASE_FIXTURE_MODULE}.py"))
    }

    /// Fixture module of the per-client (v1) suite.
    pub fn client_fixtures_path(&self) -> PathBuf {
        service_file(&self.paths.fixtures, &self.service_module)
    }

    /// Fixture module of the service-object (v2) suite.
    pub fn service_fixture_path(&self) -> PathBuf {
        service_file(&self.paths.fixtures, &service_fixture_name(&self.service_name))
    }

    pub fn service_fixture_import(&self) -> String {
        module_import(&self.service_fixture_path())
    }

    pub fn settings_path(&self) -> PathBuf {
        self.paths.settings.join(format!("{SETTINGS_MODULE}.py"))
    }

    pub fn settings_import(&self) -> String {
        module_import(&self.settings_path())
    }

    // Tests.

    pub fn conftest_path(&self) -> PathBuf {
        self.paths.tests.join("conftest.py")
    }

    pub fn test_path(&self, group: &GroupName, method_name: &str) -> PathBuf {
        self.tests_dir
            .join(module_name(group))
            .join(format!("test_{method_name}.py"))
    }
}

fn module_import(file: &Path) -> String {
    import_path(&file.with_extension(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = Layout::new("Billing", &OutputPaths::default());
        let orders = GroupName::Named("Orders".into());

        assert_eq!(layout.service_module, "billing");
        assert_eq!(
            layout.api_module_path(&orders),
            PathBuf::from("internal/clients/http/billing/apis/orders_api.py")
        );
        assert_eq!(
            layout.models_import(),
            "internal.clients.http.billing.models.api_models"
        );
        assert_eq!(
            layout.client_import(&orders),
            "framework.clients.http.billing.orders_client"
        );
        assert_eq!(
            layout.service_fixture_path(),
            PathBuf::from("framework/fixtures/http/billing_service.py")
        );
        assert_eq!(
            layout.client_fixtures_path(),
            PathBuf::from("framework/fixtures/http/billing.py")
        );
        assert_eq!(layout.settings_import(), "framework.settings.base_settings");
        assert_eq!(
            layout.test_path(&GroupName::Untagged, "get_status"),
            PathBuf::from("tests/billing/default/test_get_status.py")
        );
    }

    #[test]
    fn test_service_suffix_is_not_doubled() {
        let layout = Layout::new("payments-service", &OutputPaths::default());
        assert_eq!(
            layout.service_fixture_import(),
            "framework.fixtures.http.payments_service"
        );
    }
}
