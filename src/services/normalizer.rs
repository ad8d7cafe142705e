// src/services/normalizer.rs

use rust_decimal::Decimal;

use crate::models::orders::{CanonicalOrder, LegacyOrderRow, OrderItem, OrderRecordRow};

// Normaliza o identificador de cliente para a chave usada na contagem de
// clientes distintos: a forma textual com espaços aparados. Vazio depois de
// aparar = cliente anônimo, que não entra na contagem.
pub fn customer_key(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

// Converte um registro por transação na forma canônica.
// O `total` do registro é o valor autoritativo: nunca recalculado a partir
// dos itens. Registro sem total E sem itens vira valor 0, com log, para a
// agregação sobreviver a dados parcialmente malformados.
pub fn from_order_record(row: &OrderRecordRow) -> CanonicalOrder {
    let items = parse_items(row);

    if row.total.is_none() && items.is_empty() {
        tracing::warn!(
            pedido = %row.id,
            "registro sem total e sem itens; valor tratado como 0"
        );
    }

    let quantity: i64 = items.iter().map(|it| it.qty).sum();
    let items_summary = match items.as_slice() {
        [only] => only.name.clone(),
        _ => format!("{} items", items.len()),
    };

    CanonicalOrder {
        id: row.id,
        items_summary,
        quantity,
        total_amount: row.total.unwrap_or(Decimal::ZERO),
        payment_method: row.payment_method.clone().unwrap_or_default(),
        created_at: row.created_at,
        customer_id: customer_key(row.customer_id.as_deref()),
        store_id: row.store_id.clone(),
    }
}

// Converte UMA linha do log legado na forma canônica.
// A linha representa um único item, não uma transação: o valor é
// `price * qty` e cada linha conta como um pedido no resumo do dia
// (aproximação herdada do formato legado). Nunca usada para exibição.
pub fn from_legacy_line(row: &LegacyOrderRow) -> CanonicalOrder {
    if row.price.is_none() && row.qty.is_none() {
        tracing::warn!(
            pedido = %row.id,
            "linha legada sem price e sem qty; valor tratado como 0"
        );
    }

    let price = row.price.unwrap_or(Decimal::ZERO);
    let qty = row.qty.unwrap_or(0);

    CanonicalOrder {
        id: row.id,
        items_summary: String::new(),
        quantity: qty,
        total_amount: price * Decimal::from(qty),
        payment_method: String::new(),
        created_at: row.created_at,
        customer_id: customer_key(row.customer_id.as_deref()),
        store_id: None,
    }
}

// Lista de itens ilegível degrada para vazia em vez de derrubar o lote.
fn parse_items(row: &OrderRecordRow) -> Vec<OrderItem> {
    let Some(value) = &row.items else {
        return Vec::new();
    };

    match serde_json::from_value::<Vec<OrderItem>>(value.clone()) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(
                pedido = %row.id,
                erro = %e,
                "lista de itens ilegível; tratando como vazia"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn record(items: Option<serde_json::Value>, total: Option<Decimal>) -> OrderRecordRow {
        OrderRecordRow {
            id: Uuid::new_v4(),
            items,
            total,
            payment_method: None,
            customer_id: None,
            store_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn transacao_com_dois_itens_gera_rotulo_e_soma_quantidades() {
        let row = record(
            Some(json!([{"name": "A", "qty": 2}, {"name": "B", "qty": 3}])),
            Some(Decimal::from(40)),
        );

        let order = from_order_record(&row);

        assert_eq!(order.items_summary, "2 items");
        assert_eq!(order.quantity, 5);
        // O total do registro é autoritativo, não recalculado dos itens.
        assert_eq!(order.total_amount, Decimal::from(40));
    }

    #[test]
    fn transacao_com_um_item_usa_o_nome_do_item() {
        let row = record(
            Some(json!([{"name": "Café Gelado", "qty": 1}])),
            Some(Decimal::from(12)),
        );

        let order = from_order_record(&row);

        assert_eq!(order.items_summary, "Café Gelado");
        assert_eq!(order.quantity, 1);
    }

    #[test]
    fn total_ausente_vira_zero() {
        let row = record(Some(json!([{"name": "A", "qty": 1}])), None);

        let order = from_order_record(&row);

        assert_eq!(order.total_amount, Decimal::ZERO);
    }

    #[test]
    fn itens_ilegiveis_degradam_para_lista_vazia() {
        let row = record(Some(json!({"isto": "não é uma lista"})), Some(Decimal::ONE));

        let order = from_order_record(&row);

        assert_eq!(order.items_summary, "0 items");
        assert_eq!(order.quantity, 0);
        assert_eq!(order.total_amount, Decimal::ONE);
    }

    #[test]
    fn pagamento_ausente_vira_string_vazia() {
        let row = record(None, Some(Decimal::ONE));

        let order = from_order_record(&row);

        assert_eq!(order.payment_method, "");
    }

    #[test]
    fn linha_legada_multiplica_preco_por_quantidade() {
        let row = LegacyOrderRow {
            id: Uuid::new_v4(),
            price: Some(Decimal::new(1050, 2)), // 10.50
            qty: Some(3),
            customer_id: Some("c1".to_string()),
            created_at: Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap(),
        };

        let order = from_legacy_line(&row);

        assert_eq!(order.total_amount, Decimal::new(3150, 2)); // 31.50
        assert_eq!(order.quantity, 3);
        assert_eq!(order.customer_id.as_deref(), Some("c1"));
    }

    #[test]
    fn linha_legada_sem_campos_numericos_vira_zero() {
        let row = LegacyOrderRow {
            id: Uuid::new_v4(),
            price: None,
            qty: None,
            customer_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap(),
        };

        let order = from_legacy_line(&row);

        assert_eq!(order.total_amount, Decimal::ZERO);
    }

    #[test]
    fn chave_de_cliente_apara_espacos_e_descarta_vazios() {
        // Representações diferentes do mesmo identificador colapsam na mesma chave.
        assert_eq!(customer_key(Some(" c1 ")), Some("c1".to_string()));
        assert_eq!(customer_key(Some("c1")), Some("c1".to_string()));
        assert_eq!(customer_key(Some("   ")), None);
        assert_eq!(customer_key(None), None);
    }
}
