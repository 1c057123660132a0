//! Package resolver implementations for reading packaged versions

mod arch;
mod aur;
mod yum;

pub use arch::{ArchPackage, DEFAULT_ARCH};
pub use aur::AurPackage;
pub use yum::YumPackage;

use crate::config::Endpoints;
use crate::version::descriptor::{PackageDescriptor, PackageKind};
use crate::version::error::ResolveError;
use crate::version::package::PackageResolver;

/// Build the resolver for a package descriptor
///
/// The package name defaults to `item_name`.
pub fn build_package(
    item_name: &str,
    descriptor: &PackageDescriptor,
    endpoints: &Endpoints,
) -> Result<Box<dyn PackageResolver>, ResolveError> {
    if descriptor.kind.is_empty() {
        return Err(ResolveError::missing_field("package", "kind"));
    }
    let kind: PackageKind = descriptor.kind.parse().map_err(|_| {
        ResolveError::Config(format!("unknown package kind \"{}\"", descriptor.kind))
    })?;
    let name = descriptor.name.as_deref().unwrap_or(item_name);
    let required = |field: &'static str, value: &Option<String>| {
        value
            .clone()
            .ok_or_else(|| ResolveError::missing_field(&format!("{} package", kind.as_str()), field))
    };

    let resolver: Box<dyn PackageResolver> = match kind {
        PackageKind::Aur => Box::new(AurPackage::new(name, &endpoints.aur)),
        PackageKind::Arch => Box::new(ArchPackage::new(
            name,
            &required("repo", &descriptor.repo)?,
            descriptor.arch.as_deref().unwrap_or(DEFAULT_ARCH),
            &endpoints.arch,
        )),
        PackageKind::Yum => Box::new(YumPackage::new(name, &required("url", &descriptor.url)?)),
    };

    Ok(resolver)
}
