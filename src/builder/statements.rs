use crate::error::StatementError;
use crate::plan::{ActionSpec, AttributePair, DataType, UpdateStatement};
use ahash::AHashSet;

/// A static `(type, variable, expression)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementDef {
    pub data_type: DataType,
    pub variable: &'static str,
    pub expression: &'static str,
}

/// A labelled group of statements, emitted as one update-data action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateBlock {
    pub label: &'static str,
    pub statements: &'static [StatementDef],
}

/// A participant-data attribute read into a flow variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDef {
    pub attribute: &'static str,
    pub variable: &'static str,
}

/// Declares an `UpdateBlock` from `(Type, "Flow.var", "expression")` rows.
macro_rules! update_block {
    ( $label:expr; $( ($ty:ident, $var:expr, $expr:expr) ),* $(,)? ) => {
        UpdateBlock {
            label: $label,
            statements: &[
                $( StatementDef { data_type: DataType::$ty, variable: $var, expression: $expr }, )*
            ],
        }
    };
}

pub const HEADER_BLOCK: UpdateBlock = update_block! { "Header";
    (Boolean, "Flow.encabezado", "false"),
};

pub const UUI_BLOCK: UpdateBlock = update_block! { "UUIIData";
    (String, "Flow.var_scr_uuiData", r#"Split(Call.UUIData,",")"#),
};

// Customer credentials are never baked into the table; they default to empty.
pub const FLOW_VARS_BLOCK: UpdateBlock = update_block! { "Flow vars";
    (String, "Flow.var_ivr_ani", r#"if(Contains(ToPhoneNumber(Call.Ani).e164,"+"),Substring(Split(ToPhoneNumber(Call.Ani).e164,"+")[1],2,20),ToPhoneNumber(Call.Ani).e164)"#),
    (String, "Flow.var_ivr_dnis", r#"if(Contains(ToPhoneNumber(Call.CalledAddress).e164,"+"),Substring(Split(ToPhoneNumber(Call.CalledAddress).e164,"+")[1],2,20),ToPhoneNumber(Call.CalledAddress).e164)"#),
    (String, "Flow.var_ivr_interactionId", "Call.ConversationId"),
    (String, "Flow.var_ivr_username", r#""""#),
    (String, "Flow.var_ivr_password", r#""""#),
    (String, "Flow.var_ivr_interactionDate", "ToString(AddHours(GetCurrentDateTimeUtc(),-5))"),
    (String, "Flow.var_scr_queueId", r#"Split(Flow.var_scr_uuiData,",")[2]"#),
    (String, "Flow.var_scr_queueName", r#"Split(Flow.var_scr_uuiData,",")[3]"#),
    (String, "Flow.var_scr_personId", r#"Split(Flow.var_scr_uuiData,",")[0]"#),
    (String, "Flow.var_scr_personName", r#"Split(Flow.var_scr_uuiData,",")[1]"#),
    (String, "Flow.var_scr_numeroSolicitud", r#"Split(Flow.var_scr_uuiData,",")[4]"#),
    (String, "Flow.var_ivr_customerId", r#"Split(Flow.var_scr_uuiData,",")[5]"#),
    (String, "Flow.var_ivr_customerDni", r#""""#),
    (String, "Flow.var_ivr_customerName", r#""""#),
    (Boolean, "Flow.var_ivr_esAltoValor", "false"),
    (String, "Flow.var_scr_custom1", r#""""#),
    (String, "Flow.var_scr_custom2", r#""""#),
    (String, "Flow.var_scr_custom3", r#""""#),
    (String, "Flow.var_scr_custom4", r#""""#),
    (String, "Flow.var_scr_custom5", r#""""#),
    (String, "Flow.var_ivr_origin", r#""PureCloud Contact Center""#),
    (String, "Flow.var_ivr_p1", r#""""#),
    (String, "Flow.var_ivr_p2", r#""""#),
    (String, "Flow.var_ivr_p3", r#""""#),
    (String, "Flow.var_ivr_p4", r#""""#),
    (String, "Flow.var_ivr_p5", r#""""#),
};

/// Update blocks run by the startup task, in order.
pub const STARTUP_BLOCKS: &[UpdateBlock] = &[HEADER_BLOCK, UUI_BLOCK, FLOW_VARS_BLOCK];

pub const CUSTOMER_ATTRIBUTES: &[AttributeDef] = &[
    AttributeDef {
        attribute: r#""var_ivr_customerName""#,
        variable: "Flow.var_ivr_customerName",
    },
    AttributeDef {
        attribute: r#""var_ivr_customerDni""#,
        variable: "Flow.var_ivr_customerDni",
    },
];

/// Turns each block into one `UpdateData` action.
pub fn emit_update_blocks(blocks: &[UpdateBlock]) -> Vec<ActionSpec> {
    blocks
        .iter()
        .map(|block| ActionSpec::UpdateData {
            label: block.label.to_string(),
            statements: block
                .statements
                .iter()
                .map(|s| UpdateStatement {
                    data_type: s.data_type,
                    variable: s.variable.to_string(),
                    expression: s.expression.to_string(),
                })
                .collect(),
        })
        .collect()
}

pub fn emit_participant_data(label: &str, attributes: &[AttributeDef]) -> ActionSpec {
    ActionSpec::GetParticipantData {
        label: label.to_string(),
        attributes: attributes
            .iter()
            .map(|a| AttributePair {
                attribute_name: a.attribute.to_string(),
                variable: a.variable.to_string(),
            })
            .collect(),
    }
}

/// Checks the tables on their own, without building a plan.
///
/// All problems are reported, not just the first one.
pub fn validate_statement_table(
    blocks: &[UpdateBlock],
    attributes: &[AttributeDef],
) -> Result<(), Vec<StatementError>> {
    let mut errors = Vec::new();

    for block in blocks {
        if block.label.trim().is_empty() {
            errors.push(StatementError::EmptyLabel);
        }
        let mut assigned = AHashSet::new();
        for statement in block.statements {
            if !is_variable_name(statement.variable) {
                errors.push(StatementError::InvalidVariable {
                    block: block.label.to_string(),
                    variable: statement.variable.to_string(),
                });
            }
            if statement.expression.trim().is_empty() {
                errors.push(StatementError::EmptyExpression {
                    block: block.label.to_string(),
                    variable: statement.variable.to_string(),
                });
            }
            if !assigned.insert(statement.variable) {
                errors.push(StatementError::DuplicateVariable {
                    block: block.label.to_string(),
                    variable: statement.variable.to_string(),
                });
            }
        }
    }

    for attribute in attributes {
        if attribute.attribute.trim().is_empty() || !is_variable_name(attribute.variable) {
            errors.push(StatementError::InvalidAttributeTarget {
                attribute: attribute.attribute.to_string(),
                variable: attribute.variable.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `Flow.<ident>` or `Task.<ident>`.
pub fn is_variable_name(name: &str) -> bool {
    let Some((scope, ident)) = name.split_once('.') else {
        return false;
    };
    if scope != "Flow" && scope != "Task" {
        return false;
    }
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
