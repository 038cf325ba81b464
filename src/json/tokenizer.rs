//! 拉取式 JSON 词法/语法扫描器
//!
//! 维护一个作用域栈（文档、数组、对象），每次调用只读取下一个 token。
//! 字节偏移与作用域在多次调用之间保持，因此可以从任意位置继续读取。

use std::io::{self, BufRead};

use super::error::{ParseError, SyntaxError};
use super::token::Token;

/// 当前所处的语法位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    EmptyDocument,
    NonEmptyDocument,
    EmptyArray,
    NonEmptyArray,
    EmptyObject,
    /// 已读到字段名，等待 ':' 和值
    DanglingName,
    NonEmptyObject,
}

/// 基于 `BufRead` 的拉取式 tokenizer，只接受单个顶层值。
#[derive(Debug)]
pub struct JsonTokenizer<R> {
    reader: R,
    offset: u64,
    scopes: Vec<Scope>,
    peeked: Option<Token>,
}

impl<R: BufRead> JsonTokenizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            scopes: vec![Scope::EmptyDocument],
            peeked: None,
        }
    }

    /// 已消费的字节数
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 当前容器嵌套深度（顶层为 0）
    pub fn depth(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    /// 查看下一个 token 但不消费。`None` 表示顶层值之后的输入已正常结束。
    pub fn peek(&mut self) -> Result<Option<&Token>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.advance()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// 读取下一个 token
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.advance(),
        }
    }

    /// 取回底层 reader（丢弃尚未消费的 peek 结果）
    pub fn into_inner(self) -> R {
        self.reader
    }

    pub(crate) fn syntax(&self, kind: SyntaxError) -> ParseError {
        ParseError::Syntax {
            offset: self.offset,
            kind,
        }
    }

    pub(crate) fn unexpected_token(&self, expected: &'static str, found: Option<&Token>) -> ParseError {
        self.syntax(SyntaxError::UnexpectedToken {
            expected,
            found: found.map_or("end of input", Token::describe),
        })
    }

    fn advance(&mut self) -> Result<Option<Token>, ParseError> {
        let top = self.scopes.last().copied().unwrap_or(Scope::NonEmptyDocument);
        match top {
            Scope::EmptyDocument => {
                self.set_top(Scope::NonEmptyDocument);
                self.read_value().map(Some)
            }
            Scope::NonEmptyDocument => match self.skip_whitespace()? {
                None => Ok(None),
                Some(_) => Err(self.syntax(SyntaxError::TrailingData)),
            },
            Scope::EmptyArray | Scope::NonEmptyArray => {
                let byte = self.expect_byte()?;
                if byte == b']' {
                    self.bump();
                    self.scopes.pop();
                    return Ok(Some(Token::EndArray));
                }
                if top == Scope::NonEmptyArray {
                    if byte != b',' {
                        return Err(self.unexpected_byte(byte));
                    }
                    self.bump();
                }
                self.set_top(Scope::NonEmptyArray);
                self.read_value().map(Some)
            }
            Scope::EmptyObject | Scope::NonEmptyObject => {
                let mut byte = self.expect_byte()?;
                if byte == b'}' {
                    self.bump();
                    self.scopes.pop();
                    return Ok(Some(Token::EndObject));
                }
                if top == Scope::NonEmptyObject {
                    if byte != b',' {
                        return Err(self.unexpected_byte(byte));
                    }
                    self.bump();
                    byte = self.expect_byte()?;
                }
                if byte != b'"' {
                    return Err(self.unexpected_byte(byte));
                }
                self.bump();
                let name = self.read_string()?;
                self.set_top(Scope::DanglingName);
                Ok(Some(Token::Name(name)))
            }
            Scope::DanglingName => {
                let byte = self.expect_byte()?;
                if byte != b':' {
                    return Err(self.unexpected_byte(byte));
                }
                self.bump();
                self.set_top(Scope::NonEmptyObject);
                self.read_value().map(Some)
            }
        }
    }

    fn read_value(&mut self) -> Result<Token, ParseError> {
        let byte = self.expect_byte()?;
        match byte {
            b'{' => {
                self.bump();
                self.scopes.push(Scope::EmptyObject);
                Ok(Token::BeginObject)
            }
            b'[' => {
                self.bump();
                self.scopes.push(Scope::EmptyArray);
                Ok(Token::BeginArray)
            }
            b'"' => {
                self.bump();
                self.read_string().map(Token::String)
            }
            b't' => self.read_literal(b"true").map(|_| Token::Bool(true)),
            b'f' => self.read_literal(b"false").map(|_| Token::Bool(false)),
            b'n' => self.read_literal(b"null").map(|_| Token::Null),
            b'-' | b'0'..=b'9' => self.read_number().map(Token::Number),
            other => Err(self.unexpected_byte(other)),
        }
    }

    fn set_top(&mut self, scope: Scope) {
        if let Some(top) = self.scopes.last_mut() {
            *top = scope;
        }
    }

    fn unexpected_byte(&self, byte: u8) -> ParseError {
        self.syntax(SyntaxError::UnexpectedChar(char::from(byte)))
    }

    // ---- 字节层 ----

    fn fill(&mut self) -> Result<&[u8], ParseError> {
        let available = loop {
            match self.reader.fill_buf() {
                Ok(buf) => break buf.len(),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(ParseError::Io(err)),
            }
        };
        if available == 0 {
            return Ok(&[]);
        }
        // 缓冲区非空，再次 fill_buf 直接返回缓冲内容，不会读取底层输入
        self.reader.fill_buf().map_err(ParseError::Io)
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, ParseError> {
        Ok(self.fill()?.first().copied())
    }

    fn bump(&mut self) {
        self.consume(1);
    }

    fn consume(&mut self, n: usize) {
        self.reader.consume(n);
        self.offset += n as u64;
    }

    fn next_byte(&mut self) -> Result<u8, ParseError> {
        match self.peek_byte()? {
            Some(byte) => {
                self.bump();
                Ok(byte)
            }
            None => Err(self.syntax(SyntaxError::UnexpectedEof)),
        }
    }

    fn skip_whitespace(&mut self) -> Result<Option<u8>, ParseError> {
        while let Some(byte) = self.peek_byte()? {
            if !matches!(byte, b' ' | b'\t' | b'\n' | b'\r') {
                return Ok(Some(byte));
            }
            self.bump();
        }
        Ok(None)
    }

    fn expect_byte(&mut self) -> Result<u8, ParseError> {
        match self.skip_whitespace()? {
            Some(byte) => Ok(byte),
            None => Err(self.syntax(SyntaxError::UnexpectedEof)),
        }
    }

    // ---- 标量 ----

    /// 读取字符串内容（起始引号已消费）
    fn read_string(&mut self) -> Result<String, ParseError> {
        let mut out = Vec::new();
        loop {
            let buf = self.fill()?;
            if buf.is_empty() {
                return Err(self.syntax(SyntaxError::UnexpectedEof));
            }
            let stop = buf
                .iter()
                .position(|&b| b == b'"' || b == b'\\' || b < 0x20);
            let run = stop.unwrap_or(buf.len());
            out.extend_from_slice(&buf[..run]);
            let stop_byte = stop.map(|i| buf[i]);
            self.consume(run);

            match stop_byte {
                None => continue,
                Some(b'"') => {
                    self.bump();
                    break;
                }
                Some(b'\\') => {
                    self.bump();
                    self.read_escape(&mut out)?;
                }
                Some(_) => return Err(self.syntax(SyntaxError::ControlCharacter)),
            }
        }
        String::from_utf8(out).map_err(|_| self.syntax(SyntaxError::InvalidUtf8))
    }

    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        let ch = match self.next_byte()? {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => self.read_unicode_escape()?,
            _ => return Err(self.syntax(SyntaxError::InvalidEscape)),
        };
        let mut utf8 = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }

    fn read_unicode_escape(&mut self) -> Result<char, ParseError> {
        let high = self.read_hex4()?;
        let code = if (0xD800..0xDC00).contains(&high) {
            // 代理对：必须紧跟 \uDC00..\uDFFF
            if self.next_byte()? != b'\\' || self.next_byte()? != b'u' {
                return Err(self.syntax(SyntaxError::InvalidEscape));
            }
            let low = self.read_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.syntax(SyntaxError::InvalidEscape));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| self.syntax(SyntaxError::InvalidEscape))
    }

    fn read_hex4(&mut self) -> Result<u32, ParseError> {
        let mut code = 0;
        for _ in 0..4 {
            let byte = self.next_byte()?;
            let digit = char::from(byte)
                .to_digit(16)
                .ok_or_else(|| self.syntax(SyntaxError::InvalidEscape))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`，原样保留文本
    fn read_number(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();
        if self.peek_byte()? == Some(b'-') {
            text.push('-');
            self.bump();
        }
        match self.peek_byte()? {
            Some(b'0') => {
                text.push('0');
                self.bump();
            }
            Some(b'1'..=b'9') => {
                self.take_digits(&mut text)?;
            }
            _ => return Err(self.syntax(SyntaxError::InvalidNumber)),
        }
        if self.peek_byte()? == Some(b'.') {
            text.push('.');
            self.bump();
            if self.take_digits(&mut text)? == 0 {
                return Err(self.syntax(SyntaxError::InvalidNumber));
            }
        }
        if let Some(exp @ (b'e' | b'E')) = self.peek_byte()? {
            text.push(char::from(exp));
            self.bump();
            if let Some(sign @ (b'+' | b'-')) = self.peek_byte()? {
                text.push(char::from(sign));
                self.bump();
            }
            if self.take_digits(&mut text)? == 0 {
                return Err(self.syntax(SyntaxError::InvalidNumber));
            }
        }
        Ok(text)
    }

    fn take_digits(&mut self, text: &mut String) -> Result<usize, ParseError> {
        let mut count = 0;
        while let Some(digit @ b'0'..=b'9') = self.peek_byte()? {
            text.push(char::from(digit));
            self.bump();
            count += 1;
        }
        Ok(count)
    }

    fn read_literal(&mut self, literal: &'static [u8]) -> Result<(), ParseError> {
        for &expected in literal {
            match self.peek_byte()? {
                Some(byte) if byte == expected => self.bump(),
                Some(byte) => return Err(self.unexpected_byte(byte)),
                None => return Err(self.syntax(SyntaxError::UnexpectedEof)),
            }
        }
        Ok(())
    }
}
