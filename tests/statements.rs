//! Tests for the static startup statement tables.
use survey_flow::builder::statements::*;
use survey_flow::error::StatementError;
use survey_flow::plan::{ActionSpec, DataType};

#[test]
fn test_default_tables_are_valid() {
    assert!(validate_statement_table(STARTUP_BLOCKS, CUSTOMER_ATTRIBUTES).is_ok());
}

#[test]
fn test_default_table_shape() {
    assert_eq!(STARTUP_BLOCKS.len(), 3);
    assert_eq!(HEADER_BLOCK.statements.len(), 1);
    assert_eq!(HEADER_BLOCK.statements[0].data_type, DataType::Boolean);
    assert_eq!(UUI_BLOCK.statements[0].variable, "Flow.var_scr_uuiData");
    assert_eq!(FLOW_VARS_BLOCK.statements.len(), 26);
    assert_eq!(CUSTOMER_ATTRIBUTES.len(), 2);
}

#[test]
fn test_credentials_are_not_baked_in() {
    for variable in ["Flow.var_ivr_username", "Flow.var_ivr_password"] {
        let statement = FLOW_VARS_BLOCK
            .statements
            .iter()
            .find(|s| s.variable == variable)
            .unwrap();
        assert_eq!(statement.expression, r#""""#);
    }
}

#[test]
fn test_emit_update_blocks_preserves_order() {
    let actions = emit_update_blocks(STARTUP_BLOCKS);
    assert_eq!(actions.len(), 3);
    match &actions[2] {
        ActionSpec::UpdateData { label, statements } => {
            assert_eq!(label, "Flow vars");
            let emitted: Vec<&str> = statements.iter().map(|s| s.variable.as_str()).collect();
            let declared: Vec<&str> = FLOW_VARS_BLOCK.statements.iter().map(|s| s.variable).collect();
            assert_eq!(emitted, declared);
        }
        other => panic!("Expected UpdateData, got {:?}", other),
    }
}

#[test]
fn test_emit_participant_data() {
    let action = emit_participant_data("Customer", CUSTOMER_ATTRIBUTES);
    match action {
        ActionSpec::GetParticipantData { label, attributes } => {
            assert_eq!(label, "Customer");
            assert_eq!(attributes[0].attribute_name, r#""var_ivr_customerName""#);
            assert_eq!(attributes[1].variable, "Flow.var_ivr_customerDni");
        }
        other => panic!("Expected GetParticipantData, got {:?}", other),
    }
}

#[test]
fn test_variable_names() {
    assert!(is_variable_name("Flow.var_ivr_ani"));
    assert!(is_variable_name("Task._tmp1"));
    assert!(!is_variable_name("Call.Ani"));
    assert!(!is_variable_name("Flow."));
    assert!(!is_variable_name("Flow.1abc"));
    assert!(!is_variable_name("Flow.with space"));
    assert!(!is_variable_name("var_ivr_ani"));
}

#[test]
fn test_all_table_errors_are_reported() {
    const BAD: &[UpdateBlock] = &[UpdateBlock {
        label: "",
        statements: &[
            StatementDef {
                data_type: DataType::String,
                variable: "Flow.a",
                expression: "1",
            },
            StatementDef {
                data_type: DataType::String,
                variable: "Flow.a",
                expression: " ",
            },
        ],
    }];
    const BAD_ATTRIBUTES: &[AttributeDef] = &[AttributeDef {
        attribute: r#""name""#,
        variable: "Call.Name",
    }];

    let errors = validate_statement_table(BAD, BAD_ATTRIBUTES).unwrap_err();
    assert_eq!(
        errors,
        vec![
            StatementError::EmptyLabel,
            StatementError::EmptyExpression {
                block: String::new(),
                variable: "Flow.a".to_string(),
            },
            StatementError::DuplicateVariable {
                block: String::new(),
                variable: "Flow.a".to_string(),
            },
            StatementError::InvalidAttributeTarget {
                attribute: r#""name""#.to_string(),
                variable: "Call.Name".to_string(),
            },
        ]
    );
}
