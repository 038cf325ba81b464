//! JSON token

/// 拉取式解析产出的单个 token。数字保留源文本，避免精度损失。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    /// 对象字段名
    Name(String),
    String(String),
    Number(String),
    Bool(bool),
    Null,
}

impl Token {
    /// 用于错误信息的简短描述
    pub fn describe(&self) -> &'static str {
        match self {
            Token::BeginObject => "'{'",
            Token::EndObject => "'}'",
            Token::BeginArray => "'['",
            Token::EndArray => "']'",
            Token::Name(_) => "field name",
            Token::String(_) => "string",
            Token::Number(_) => "number",
            Token::Bool(_) => "boolean",
            Token::Null => "null",
        }
    }
}
