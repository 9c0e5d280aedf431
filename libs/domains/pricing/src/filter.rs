use crate::models::ProductAttributes;

const BOX_USAGE_PREFIX: &str = "BoxUsage:";
const LINUX: &str = "Linux";
const RUN_INSTANCES: &str = "RunInstances";

/// Whether a catalog product is a shared-tenancy Linux on-demand instance.
///
/// The instance type must have a `family.size` shape; usage type, operating
/// system and operation are matched exactly.
pub fn is_in_scope(attrs: &ProductAttributes) -> bool {
    attrs.instance_type.contains('.')
        && attrs.usage_type.starts_with(BOX_USAGE_PREFIX)
        && attrs.operating_system == LINUX
        && attrs.operation == RUN_INSTANCES
}
