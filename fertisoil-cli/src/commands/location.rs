//! `fertisoil location`

use fertisoil::config::ConfigFile;
use fertisoil::location::LocationService;
use fertisoil::provider::BigDataCloudProvider;

use super::common::{http_client, print_json};
use super::CoordArgs;
use crate::error::CliError;

pub fn run(args: CoordArgs, config: &ConfigFile) -> Result<(), CliError> {
    let coord = args.coordinate()?;

    let client = http_client(config.location_timeout())?;
    let provider = BigDataCloudProvider::with_base_url(client, config.location.url.clone());
    let service = LocationService::new(provider);

    print_json(&service.get_location_info(coord))
}
