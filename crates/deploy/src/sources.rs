//! The two fixed Solidity contract templates this tool deploys.

/// Source name for the fungible token template.
pub const TOKEN_SOURCE_NAME: &str = "MintableToken.sol";

/// Owner-gated mintable token. Supply and mint amounts are passed unscaled;
/// the contract scales by its own decimals.
pub const TOKEN_SOURCE: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.20;
contract MintableToken {
    string public name;
    string public symbol;
    uint8 public decimals = 18;
    uint256 public totalSupply;
    address public owner;
    mapping(address => uint256) public balanceOf;
    event Transfer(address indexed from, address indexed to, uint256 value);

    modifier onlyOwner(){ require(msg.sender == owner, "ONLY_OWNER"); _; }

    constructor(string memory _name, string memory _symbol, uint256 _initialSupply) {
        name = _name; symbol = _symbol; owner = msg.sender;
        uint256 supply = _initialSupply * (10 ** uint256(decimals));
        totalSupply = supply;
        balanceOf[msg.sender] = supply;
        emit Transfer(address(0), msg.sender, supply);
    }
    function mint(address to, uint256 amount) external onlyOwner {
        uint256 value = amount * (10 ** uint256(decimals));
        totalSupply += value;
        balanceOf[to] += value;
        emit Transfer(address(0), to, value);
    }
    function transfer(address to, uint256 value) external returns (bool) {
        require(balanceOf[msg.sender] >= value, "INSUFFICIENT_BALANCE");
        unchecked { balanceOf[msg.sender] -= value; }
        balanceOf[to] += value;
        emit Transfer(msg.sender, to, value);
        return true;
    }
}"#;

/// Source name for the NFT template.
pub const NFT_SOURCE_NAME: &str = "SimpleNFT.sol";

/// Owner-gated NFT with sequential ids; `mint(to)` returns the new token id.
pub const NFT_SOURCE: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.20;
contract SimpleNFT {
    string public name;
    string public symbol;
    uint256 public nextTokenId;
    address public owner;
    mapping(uint256 => address) public ownerOf;
    mapping(address => uint256) public balanceOf;
    event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
    modifier onlyOwner(){ require(msg.sender == owner, "ONLY_OWNER"); _; }
    constructor(string memory _name, string memory _symbol) {
        name = _name; symbol = _symbol; owner = msg.sender;
    }
    function mint(address to) external onlyOwner returns (uint256) {
        uint256 tokenId = ++nextTokenId;
        ownerOf[tokenId] = to;
        balanceOf[to] += 1;
        emit Transfer(address(0), to, tokenId);
        return tokenId;
    }
}"#;
