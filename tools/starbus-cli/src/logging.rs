use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::FilterFn, fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt,
};

pub fn init(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = FilterFn::new(|meta| meta.module_path().unwrap_or_default().starts_with("starbus"));
    let layer = tracing_subscriber::fmt::layer()
        .event_format(Format::default().without_time().with_target(verbose))
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .with(level)
        .init();
}
