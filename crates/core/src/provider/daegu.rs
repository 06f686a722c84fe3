//! HTTP client for the Daegu bus information provider.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Client, Url};
use starbus_transit::{
    ArrivalRecord, Result, RouteIdentifier, RouteStop, Stop, StopIdentifier, TransitDataSource,
    TransitError, VehiclePosition,
};
use tracing::debug;

use crate::config::StarbusConfig;
use crate::provider::envelope::{self, ArrivalBody, ItemsBody};

fn transport(error: reqwest::Error) -> TransitError {
    TransitError::Transport(error.to_string())
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| TransitError::InvalidData(format!("bad endpoint {raw:?}: {e}")))
}

pub struct DaeguBusClient {
    client: Client,
    search_url: Url,
    arrivals_url: Url,
    route_stops_url: Url,
    route_positions_url: Url,
    service_key: Option<String>,
}

impl DaeguBusClient {
    pub fn new(config: &StarbusConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(transport)?;

        Ok(Self {
            client,
            search_url: parse_url(&config.search_url)?,
            arrivals_url: parse_url(&config.arrivals_url)?,
            route_stops_url: parse_url(&config.route_stops_url)?,
            route_positions_url: parse_url(&config.route_positions_url)?,
            service_key: config.service_key.clone(),
        })
    }

    async fn get<B>(&self, url: Url) -> Result<B>
    where
        B: for<'de> serde::Deserialize<'de>,
    {
        // query strings may carry the service key, so only the path is logged
        debug!(path = url.path(), "provider request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport)?;
        let bytes = response.bytes().await.map_err(transport)?;

        envelope::decode(&bytes)
    }

    fn search_request(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("searchText", query)
            .append_pair("wincId", "");
        url
    }

    fn arrivals_request(&self, stop_id: &StopIdentifier) -> Result<Url> {
        let mut url = self.arrivals_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransitError::InvalidData(format!("{} cannot take a path", self.arrivals_url)))?
            .pop_if_empty()
            .push(stop_id.as_str());
        Ok(url)
    }

    fn route_request(&self, base: &Url, route_id: &RouteIdentifier) -> Result<Url> {
        let key = self.service_key.as_deref().ok_or_else(|| {
            TransitError::InvalidData("route endpoints need a service key".to_string())
        })?;

        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("serviceKey", key)
            .append_pair("routeId", route_id.as_str());
        Ok(url)
    }
}

impl TransitDataSource for DaeguBusClient {
    fn search_stops<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Stop>>> + Send + 'a>> {
        Box::pin(async move { self.get::<Vec<Stop>>(self.search_request(query)).await })
    }

    fn arrivals<'a>(
        &'a self,
        stop_id: &'a StopIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ArrivalRecord>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.arrivals_request(stop_id)?;
            self.get::<ArrivalBody>(url).await?.into_records()
        })
    }

    fn route_stops<'a>(
        &'a self,
        route_id: &'a RouteIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RouteStop>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.route_request(&self.route_stops_url, route_id)?;
            self.get::<ItemsBody<RouteStop>>(url).await?.into_itinerary()
        })
    }

    fn vehicle_positions<'a>(
        &'a self,
        route_id: &'a RouteIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<VehiclePosition>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.route_request(&self.route_positions_url, route_id)?;
            Ok(self
                .get::<ItemsBody<VehiclePosition>>(url)
                .await?
                .into_positions())
        })
    }
}
