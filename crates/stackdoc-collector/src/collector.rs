use stackdoc_gateway::{GatewayError, GatewayResult, LicenseInfo, PortainerApi, Stack};
use stackdoc_reconcile::DeploymentReconciler;
use tracing::{info, warn};

use crate::bundle::{BundleBuilder, CollectedBundle};
use crate::options::CollectionOptions;

/// Stored in place of a compose file that could not be fetched.
pub const COMPOSE_FILE_UNAVAILABLE: &str = "Could not retrieve compose file";

/// Gathers every enabled resource category from one host.
pub struct ResourceCollector<'a> {
    api: &'a dyn PortainerApi,
    options: CollectionOptions,
}

impl<'a> ResourceCollector<'a> {
    pub fn new(api: &'a dyn PortainerApi, options: CollectionOptions) -> Self {
        Self { api, options }
    }

    /// Runs one collection pass.
    ///
    /// Fails only when `status`, `endpoints` or `stacks` cannot be fetched.
    /// Every other category degrades to its empty default.
    pub fn collect(&self) -> GatewayResult<CollectedBundle> {
        let host = self.api.host_name();
        let options = self.options;
        info!(host, "collecting resources");

        let status = self.api.status()?;
        let endpoints = self.api.endpoints()?;
        let mut stacks = self.api.stacks()?;
        info!(
            host,
            endpoints = endpoints.len(),
            stacks = stacks.len(),
            "collected mandatory categories"
        );

        if options.include_compose_files {
            self.attach_compose_files(&mut stacks);
        }

        let license = options
            .include_license_info
            .then(|| LicenseInfo::from_status(&status));
        let mut builder = BundleBuilder::new(status, endpoints, stacks);
        if let Some(license) = license {
            builder = builder.license(license);
        }

        if options.include_auth_settings {
            builder = match self.api.settings() {
                Ok(settings) => builder.settings(settings),
                Err(error) => {
                    self.warn_degraded("settings", &error);
                    builder
                        .settings(Default::default())
                        .degraded("settings", &error)
                }
            };
        }

        if options.include_templates {
            builder = match self.api.custom_templates() {
                Ok(templates) => builder.templates(templates),
                Err(error) => {
                    self.warn_degraded("templates", &error);
                    builder.degraded("templates", &error)
                }
            };
        }

        if options.include_registries {
            builder = match self.api.registries() {
                Ok(registries) => builder.registries(registries),
                Err(error) => {
                    self.warn_degraded("registries", &error);
                    builder.degraded("registries", &error)
                }
            };
        }

        if options.include_users_teams {
            builder = match self.api.users() {
                Ok(users) => builder.users(users),
                Err(error) => {
                    self.warn_degraded("users", &error);
                    builder.degraded("users", &error)
                }
            };
            builder = match self.api.teams() {
                Ok(teams) => builder.teams(teams),
                Err(error) => {
                    self.warn_degraded("teams", &error);
                    builder.degraded("teams", &error)
                }
            };
        }

        if options.include_images {
            builder = match self.api.images(None) {
                Ok(images) => builder.images(images),
                Err(error) => {
                    self.warn_degraded("images", &error);
                    builder.degraded("images", &error)
                }
            };
        }

        if options.include_deployments {
            let reconciler = DeploymentReconciler::new(self.api);
            builder = builder.stack_deployments(reconciler.analyze_stack_deployments());
            if options.include_templates {
                builder = builder.template_deployments(reconciler.analyze_template_deployments());
            }
        }

        let bundle = builder.build();
        info!(host, degraded = bundle.degraded.len(), "data collection completed");
        Ok(bundle)
    }

    fn attach_compose_files(&self, stacks: &mut [Stack]) {
        for stack in stacks.iter_mut() {
            let content = match self.api.stack_file(stack.id) {
                Ok(file) => file.stack_file_content,
                Err(error) => {
                    warn!(
                        host = self.api.host_name(),
                        stack_id = stack.id,
                        stack = %stack.name,
                        %error,
                        "compose file unavailable"
                    );
                    COMPOSE_FILE_UNAVAILABLE.to_string()
                }
            };
            stack.compose_file = Some(content);
        }
    }

    fn warn_degraded(&self, category: &str, error: &GatewayError) {
        warn!(
            host = self.api.host_name(),
            category,
            %error,
            "category unavailable, using empty default"
        );
    }
}
