//! `fertisoil soil`

use fertisoil::config::ConfigFile;
use fertisoil::provider::SoilGridsProvider;
use fertisoil::soil::SoilDataService;

use super::common::{http_client, print_json};
use super::CoordArgs;
use crate::error::CliError;

pub fn run(args: CoordArgs, config: &ConfigFile) -> Result<(), CliError> {
    let coord = args.coordinate()?;

    let client = http_client(config.soil_timeout())?;
    let provider = SoilGridsProvider::with_base_url(client, config.soil.url.clone());
    let service = SoilDataService::with_cache_config(provider, config.soil_cache_config());

    let result = service.get_soil_data(coord);
    print_json(result.as_ref())
}
