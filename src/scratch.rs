//! トークン蓄積用の固定長バッファ

/// スクラッチバッファ
///
/// 現在読み取り中のトークン (メソッド名、ヘッダーキー、ヘッダー値) を
/// `feed()` 呼び出しをまたいで蓄積する。容量は作成時に固定され、
/// 容量を超える push は失敗する (伸長はしない)。
#[derive(Debug, Clone)]
pub struct ScratchBuffer {
    buf: Box<[u8]>,
    /// 次に書き込む位置
    len: usize,
}

impl ScratchBuffer {
    /// 指定容量で作成
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// 1 バイト追加
    ///
    /// 容量いっぱいの場合は書き込まずに false を返す。
    pub fn push(&mut self, byte: u8) -> bool {
        match self.buf.get_mut(self.len) {
            Some(slot) => {
                *slot = byte;
                self.len += 1;
                true
            }
            None => false,
        }
    }

    /// 書き込み位置を先頭に戻す (領域は解放しない)
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// 蓄積したバイト列を取り出す
    ///
    /// 書き込み位置はリセットされる。返り値のスライスは次の push までの間だけ有効。
    pub fn take(&mut self) -> &[u8] {
        let len = self.len;
        self.len = 0;
        &self.buf[..len]
    }

    /// 蓄積中のバイト列を覗く
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}
