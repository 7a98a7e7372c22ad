//! Prompt Construction
//!
//! System instruction, per-call user message and the response schema sent
//! to the model. Output language is Brazilian Portuguese.

use serde_json::{json, Map, Value};

use crate::analyst::OutputMode;
use crate::model::Recommendation;

/// Persona and required content, shared by both output modes
pub const ANALYST_PERSONA: &str = r#"Tu és o "Trading for Beginners with Me", um analista profissional de mercados com 15 anos de experiência em crypto e forex. O teu criador é Totti Alves Studios AI. Respondes sempre em português do Brasil, de forma objetiva, profissional e com linguagem de trader.
Sempre que um utilizador te perguntar sobre um ativo (ex: BTC, ETH, EUR/USD, XAU/USD, etc.) faz o seguinte:
1. Busca os dados mais recentes (preço atual, variação 24h/7d, volume).
2. Indica a tendência atual (curto e médio prazo).
3. Mostra níveis importantes de suporte e resistência.
4. Analisa RSI, MACD e médias móveis relevantes.
5. Dá uma recomendação clara: COMPRAR / VENDER / AGUARDAR, juntamente com preços sugeridos para stop-loss e take-profit.
6. Inclui um emoji simples que represente a tendência (ex: 📈 para alta, 📉 para baixa, ➡️ para lateral).
7. Fornece um resumo conciso da análise."#;

const SCHEMA_CONTRACT: &str = "A tua resposta DEVE seguir o schema JSON fornecido.";

const FENCED_CONTRACT: &str = "Usa a pesquisa na web para obter dados atuais. \
A tua resposta DEVE ser um único objeto JSON dentro de um bloco de código markdown \
iniciado por ```json e terminado por ```, sem texto adicional, com exatamente estes campos (todos strings): \
asset, price, change24h, change7d, volume, trendShortTerm, trendMediumTerm, support, resistance, \
rsi, macd, movingAverages, recommendation (COMPRAR, VENDER ou AGUARDAR), stopLoss, takeProfit, \
chartEmoji, summary.";

/// Field names and descriptions, in schema order
const FIELDS: [(&str, &str); 17] = [
    ("asset", "O símbolo do ativo analisado, ex: BTC/USD"),
    ("price", "O preço atual do ativo."),
    ("change24h", "A variação percentual nas últimas 24 horas, com sinal de + ou -."),
    ("change7d", "A variação percentual nos últimos 7 dias, com sinal de + ou -."),
    ("volume", "O volume de negociação nas últimas 24 horas."),
    ("trendShortTerm", "A tendência de curto prazo (ex: Alta, Baixa, Lateral)."),
    ("trendMediumTerm", "A tendência de médio prazo (ex: Alta, Baixa, Lateral)."),
    ("support", "O principal nível de suporte."),
    ("resistance", "O principal nível de resistência."),
    ("rsi", "O valor do RSI (Índice de Força Relativa) e sua interpretação (ex: 55 - Neutro)."),
    ("macd", "O estado do MACD (Convergência/Divergência de Médias Móveis) (ex: Cruzamento de alta)."),
    ("movingAverages", "Análise baseada em médias móveis relevantes (ex: Preço acima da MA50)."),
    ("recommendation", "A recomendação de ação."),
    ("stopLoss", "O preço sugerido para stop-loss."),
    ("takeProfit", "O preço sugerido para take-profit."),
    ("chartEmoji", "Um único emoji representando a tendência, ex: 📈 para alta, 📉 para baixa, ➡️ para lateral."),
    ("summary", "Um breve resumo profissional da análise."),
];

/// System instruction for the given output mode
pub fn system_instruction(mode: OutputMode) -> String {
    let contract = match mode {
        OutputMode::Schema => SCHEMA_CONTRACT,
        OutputMode::Grounded => FENCED_CONTRACT,
    };
    format!("{ANALYST_PERSONA}\n{contract}")
}

/// Per-call user message naming the asset
pub fn user_message(asset: &str) -> String {
    format!("Analisa o ativo {asset} agora.")
}

/// Response schema enumerating every analysis field.
///
/// Uses the OpenAPI subset accepted by `generationConfig.responseSchema`.
pub fn analysis_schema() -> Value {
    let mut properties = Map::new();
    for (name, description) in FIELDS {
        let mut property = json!({ "type": "STRING", "description": description });
        if name == "recommendation" {
            property["enum"] = json!(Recommendation::ALLOWED);
        }
        properties.insert(name.to_string(), property);
    }

    let required: Vec<&str> = FIELDS.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
        "propertyOrdering": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_names_asset() {
        assert_eq!(user_message("ETH"), "Analisa o ativo ETH agora.");
    }

    #[test]
    fn test_system_instruction_per_mode() {
        let schema = system_instruction(OutputMode::Schema);
        let grounded = system_instruction(OutputMode::Grounded);

        assert!(schema.starts_with(ANALYST_PERSONA));
        assert!(schema.ends_with(SCHEMA_CONTRACT));
        assert!(grounded.contains("```json"));
        assert!(!grounded.contains(SCHEMA_CONTRACT));
    }

    #[test]
    fn test_schema_requires_every_field() {
        let schema = analysis_schema();
        let required = schema["required"].as_array().unwrap();

        assert_eq!(required.len(), 17);
        assert_eq!(schema["properties"].as_object().unwrap().len(), 17);
        assert_eq!(
            schema["properties"]["recommendation"]["enum"],
            json!(["COMPRAR", "VENDER", "AGUARDAR"])
        );
        assert_eq!(schema["properties"]["change24h"]["type"], "STRING");
    }
}
