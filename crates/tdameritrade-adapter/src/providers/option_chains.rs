/*
[INPUT]:  OptionChainQuery
[OUTPUT]: Option chain keyed by expiration and strike
[POS]:    Provider layer - option chain endpoint (GET /marketdata/chains)
[UPDATE]: When chain query parameters or response shape change
*/

use async_trait::async_trait;
use tracing::debug;

use crate::http::{Result, TdAmeritradeClient};
use crate::types::{OptionChain, OptionChainQuery};

#[async_trait]
pub trait OptionChainProvider: Send + Sync {
    async fn get_option_chain(&self, query: &OptionChainQuery) -> Result<OptionChain>;
}

#[async_trait]
impl OptionChainProvider for TdAmeritradeClient {
    async fn get_option_chain(&self, query: &OptionChainQuery) -> Result<OptionChain> {
        query.validate()?;
        let chain: OptionChain = self
            .get_json("chains", &["marketdata", "chains"], &query.to_query())
            .await?;
        debug!(
            symbol = %chain.symbol,
            status = %chain.status,
            contracts = chain.number_of_contracts,
            "option chain fetched"
        );
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::auth::StaticTokenProvider;
    use crate::http::{ClientConfig, TdAmeritradeError};
    use crate::types::{Contract, Strategy};
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TdAmeritradeClient {
        TdAmeritradeClient::with_config_and_base_url(
            ClientConfig::default(),
            &server.uri(),
            Arc::new(StaticTokenProvider::new("test-token")),
        )
        .expect("client init")
    }

    #[tokio::test]
    async fn test_get_option_chain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/chains"))
            .and(query_param("symbol", "AAPL"))
            .and(query_param("contractType", "PUT"))
            .and(query_param("strategy", "SINGLE"))
            .and(query_param("range", "ALL"))
            .and(query_param("optionType", "ALL"))
            .and(query_param_is_missing("interval"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "symbol": "AAPL",
                "status": "SUCCESS",
                "numberOfContracts": 1,
                "callExpDateMap": {},
                "putExpDateMap": {
                    "2024-01-19:5": {"145.0": [{"putCall": "PUT", "symbol": "AAPL_011924P145", "bid": 0.8}]}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut query = OptionChainQuery::new("AAPL");
        query.contract_type = Contract::Put;

        let chain = client_for(&server).get_option_chain(&query).await.unwrap();
        assert!(chain.is_success());
        let contract = chain.contracts().next().expect("one contract");
        assert_eq!(contract.put_call, "PUT");
        assert_eq!(contract.bid, Some("0.8".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_spread_without_interval_omits_interval() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/chains"))
            .and(query_param("strategy", "STRADDLE"))
            .and(query_param_is_missing("interval"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "symbol": "AAPL",
                "status": "SUCCESS"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut query = OptionChainQuery::new("AAPL");
        query.strategy = Strategy::Straddle;

        let chain = client_for(&server).get_option_chain(&query).await.unwrap();
        assert!(chain.is_success());
        assert_eq!(chain.contracts().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_symbol_rejected() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .get_option_chain(&OptionChainQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TdAmeritradeError::InvalidRequest(_)));
    }
}
